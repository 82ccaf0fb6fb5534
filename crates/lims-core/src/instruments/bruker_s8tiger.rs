//! Bruker S8 Tiger XRF exports.
//!
//! The file carries no sample column: the sample id is the filename stem,
//! optionally followed by a `-<suffix>` the instrument appends. Each row is
//! one oxide/element with a concentration in `%` or `ppm`; both units are
//! stored and `reading` follows the configured preference.

use lims_ingest::InstrumentFile;
use lims_model::{
    AnalyteResolution, FieldRecord, MatchMode, ParserOptions, ResultUnit, SampleCatalog,
    SourceFormat,
};

use crate::coerce::{clamp_reading, extract_number};
use crate::instruments::{
    InstrumentInterface, InstrumentParser, SourceSettings, parse_keyed_rows,
};
use crate::keyed::KeyedRow;
use crate::keyword::sanitize_identifier;
use crate::session::ParseSession;

const READING: &str = "reading";
const READING_PCT: &str = "reading_pct";
const READING_PPM: &str = "reading_ppm";
const PCT_PER_PPM: f64 = 0.0001;

/// Export column -> stored field name. Unlisted columns are dropped.
const FIELD_MAP: &[(&str, &str)] = &[
    ("Formula", "formula"),
    ("Concentration", "concentration"),
    ("Z", "z"),
    ("Status", "status"),
    ("Line 1", "line_1"),
    ("Net int.", "net_int"),
    ("LLD", "lld"),
    ("Stat. error", "stat_error"),
    ("Analyzed layer", "analyzed_layer"),
    ("Bound %", "bound_pct"),
];

pub struct S8Tiger;

impl InstrumentInterface for S8Tiger {
    fn id(&self) -> &'static str {
        "bruker.s8tiger"
    }

    fn title(&self) -> &'static str {
        "Bruker S8 Tiger"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Xlsx, SourceFormat::Xls, SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            READING,
            READING_PCT,
            READING_PPM,
            "formula",
            "concentration",
            "z",
            "status",
            "line_1",
            "net_int",
            "lld",
            "stat_error",
            "analyzed_layer",
            "bound_pct",
        ]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        Box::new(S8TigerParser {
            source: SourceSettings::from_options(options, ',', 0),
            unit: options.unit,
        })
    }
}

pub struct S8TigerParser {
    source: SourceSettings,
    unit: ResultUnit,
}

impl InstrumentParser for S8TigerParser {
    fn parse(
        &mut self,
        file: &InstrumentFile,
        catalog: &dyn SampleCatalog,
        session: &mut ParseSession,
    ) -> bool {
        let Some(sample_id) = sample_from_filename(file.stem(), catalog) else {
            session.warn(format!("Can't find sample for {}", file.filename));
            return false;
        };
        let unit = self.unit;
        parse_keyed_rows(file, &self.source, session, |row, session| {
            parse_row(row, &sample_id, unit, catalog, session);
        })
    }
}

/// The stem itself, or the stem without its last `-` segment. Tried once each.
pub fn sample_from_filename(stem: &str, catalog: &dyn SampleCatalog) -> Option<String> {
    if catalog.contains_sample(stem) {
        return Some(stem.to_string());
    }
    let (trimmed, _) = stem.rsplit_once('-')?;
    catalog
        .contains_sample(trimmed)
        .then(|| trimmed.to_string())
}

/// Concentrations stored in both units, derived from the unit marker in `raw`.
pub fn split_units(raw: &str, value: f64) -> Option<(f64, f64)> {
    if raw.to_lowercase().contains("ppm") {
        Some((value * PCT_PER_PPM, value))
    } else if raw.contains('%') {
        Some((value, value / PCT_PER_PPM))
    } else {
        None
    }
}

fn parse_row(
    row: &KeyedRow,
    sample_id: &str,
    unit: ResultUnit,
    catalog: &dyn SampleCatalog,
    session: &mut ParseSession,
) {
    let mut fields: Vec<(&str, &str)> = Vec::new();
    for (column, field) in FIELD_MAP {
        if row.has_column(column) {
            fields.push((field, row.value(column)));
        }
    }
    let mapped = |name: &str| {
        fields
            .iter()
            .find(|(field, _)| *field == name)
            .map_or("", |(_, value)| *value)
    };

    let derived = sanitize_identifier(mapped("formula")).to_lowercase();
    let keyword = match catalog.resolve(sample_id, &derived, MatchMode::Prefix) {
        Some(AnalyteResolution::Found(keyword)) => keyword,
        Some(AnalyteResolution::Ambiguous(_)) => {
            session.line_warn(
                format!("Multiple analyses found matching Keyword \"{derived}\""),
                &row.describe(),
            );
            return;
        }
        _ => {
            session.line_log(
                format!("No analysis found matching keyword \"{derived}\""),
                &row.describe(),
            );
            return;
        }
    };

    let concentration = mapped("concentration");
    let Some(value) = extract_number(concentration) else {
        session.line_warn(
            "Can't extract numerical value from `concentration`",
            &row.describe(),
        );
        return;
    };
    let Some((pct, ppm)) = split_units(concentration, clamp_reading(value)) else {
        session.line_warn("Can't decide if reading units are PPM or %", &row.describe());
        return;
    };
    let reading = match unit {
        ResultUnit::Pct => pct,
        ResultUnit::Ppm => ppm,
    };

    let mut record = FieldRecord::with_default_result(READING);
    for (field, value) in &fields {
        record.set(*field, *value);
    }
    record.set(READING_PCT, pct);
    record.set(READING_PPM, ppm);
    record.set(READING, reading);
    session.add_result(sample_id, &keyword, record);
}
