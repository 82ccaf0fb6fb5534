//! PerkinElmer NexION 350X exports: one row per sample, one column per analyte.
//!
//! Cells are taken as reported by the instrument and read with
//! [`parse_number`], not the result coercion used by the other parsers.
//! Negative readings stay negative, and a blank, `ND` or `--` cell is a
//! "not numeric" warning rather than a zero.

use lims_ingest::InstrumentFile;
use lims_model::{
    AnalyteResolution, FieldRecord, MatchMode, ParserOptions, SampleCatalog, SourceFormat,
};

use crate::coerce::parse_number;
use crate::instruments::{
    InstrumentInterface, InstrumentParser, SourceSettings, parse_keyed_rows,
};
use crate::keyed::KeyedRow;
use crate::keyword::{sanitize_identifier, strip_non_word};
use crate::session::ParseSession;

const SAMPLE_COLUMN: &str = "Sample Id";
const READING: &str = "reading";

/// Columns that describe the run rather than an analyte.
const NON_ANALYTE_COLUMNS: &[&str] = &[
    "Sample Id",
    "R",
    "Acquisition Time",
    "QC Status",
    "Dataset File",
    "Method File",
];

/// Rows that are blanks or calibration rather than samples.
const SKIPPED_SAMPLES: &[&str] = &["", "sample id", "blk", "rblk", "calibration curves"];

pub struct Nexion350x;

impl InstrumentInterface for Nexion350x {
    fn id(&self) -> &'static str {
        "perkinelmer.nexion350x"
    }

    fn title(&self) -> &'static str {
        "Perkin Elmer Nexion 350X"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Xlsx, SourceFormat::Xls, SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[READING]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        Box::new(Nexion350xParser {
            source: SourceSettings::from_options(options, ',', 0),
        })
    }
}

pub struct Nexion350xParser {
    source: SourceSettings,
}

impl InstrumentParser for Nexion350xParser {
    fn parse(
        &mut self,
        file: &InstrumentFile,
        catalog: &dyn SampleCatalog,
        session: &mut ParseSession,
    ) -> bool {
        parse_keyed_rows(file, &self.source, session, |row, session| {
            parse_row(row, catalog, session);
        })
    }
}

fn parse_row(row: &KeyedRow, catalog: &dyn SampleCatalog, session: &mut ParseSession) {
    let raw_sample = row.value(SAMPLE_COLUMN);
    if SKIPPED_SAMPLES.contains(&raw_sample.to_lowercase().as_str()) {
        return;
    }
    let sample_id = sanitize_identifier(raw_sample);
    if !catalog.contains_sample(&sample_id) {
        session.line_warn(format!("Sample not found for {sample_id}"), &row.describe());
        return;
    }
    for (header, value) in &row.values {
        if NON_ANALYTE_COLUMNS.contains(&header.as_str()) {
            continue;
        }
        let analyte = strip_non_word(header);
        if analyte.is_empty() {
            continue;
        }
        let keyword = match catalog.resolve(&sample_id, &analyte, MatchMode::Prefix) {
            Some(AnalyteResolution::Found(keyword)) => keyword,
            Some(AnalyteResolution::Ambiguous(_)) => {
                session.line_warn(
                    format!("Multiple analyses found matching keyword '{analyte}'"),
                    &row.describe(),
                );
                continue;
            }
            _ => continue,
        };
        let Some(reading) = parse_number(value) else {
            session.line_warn(
                format!("Value for keyword {analyte} is not numeric"),
                &row.describe(),
            );
            continue;
        };
        let record = FieldRecord::with_default_result(READING).with_field(READING, reading);
        session.add_result(&sample_id, &keyword, record);
    }
}
