//! PerkinElmer WinLab32 exports: one row per sample/analyte reading.

use lims_ingest::InstrumentFile;
use lims_model::{
    AnalyteResolution, FieldRecord, MatchMode, ParserOptions, SampleCatalog, SourceFormat,
};

use crate::instruments::{
    InstrumentInterface, InstrumentParser, SourceSettings, parse_keyed_rows,
};
use crate::keyed::KeyedRow;
use crate::keyword::{sanitize_identifier, strip_non_word};
use crate::session::ParseSession;

const SAMPLE_COLUMN: &str = "Sample ID";
const ANALYTE_COLUMN: &str = "Analyte Name";
const READING_COLUMN: &str = "Reported Conc (Calib)";
const READING: &str = "reading";

pub struct Winlab32;

impl InstrumentInterface for Winlab32 {
    fn id(&self) -> &'static str {
        "perkinelmer.winlab32"
    }

    fn title(&self) -> &'static str {
        "Perkin Elmer Winlab32"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Xlsx, SourceFormat::Xls, SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[READING]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        Box::new(Winlab32Parser {
            source: SourceSettings::from_options(options, ',', 0),
        })
    }
}

pub struct Winlab32Parser {
    source: SourceSettings,
}

impl InstrumentParser for Winlab32Parser {
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
    let sample_id = sanitize_identifier(row.value(SAMPLE_COLUMN));
    let analyte = strip_non_word(row.value(ANALYTE_COLUMN));
    if sample_id.is_empty() || analyte.is_empty() {
        return;
    }
    let keyword = match catalog.resolve(&sample_id, &analyte, MatchMode::Prefix) {
        Some(AnalyteResolution::Found(keyword)) => keyword,
        other => {
            let reason = match other {
                None => "sample not found".to_string(),
                Some(AnalyteResolution::Ambiguous(_)) => {
                    format!("multiple analyses found matching keyword '{analyte}'")
                }
                _ => format!("no analysis found matching keyword '{analyte}'"),
            };
            session.line_warn(
                format!("Error getting analysis for '{sample_id}/{analyte}': {reason}"),
                &row.describe(),
            );
            return;
        }
    };
    let Some(reading) = session.coerce(READING_COLUMN, row.value(READING_COLUMN), &row.describe())
    else {
        return;
    };
    let record = FieldRecord::with_default_result(READING).with_field(READING, reading);
    session.add_result(&sample_id, &keyword, record);
}
