//! Plain `Sample,Analyte,Result` tables from any instrument or LIMS export.

use lims_ingest::InstrumentFile;
use lims_model::{
    AnalyteResolution, FieldRecord, KeyedColumns, MatchMode, ParserOptions, SampleCatalog,
    SourceFormat,
};

use crate::instruments::{
    InstrumentInterface, InstrumentParser, SourceSettings, parse_keyed_rows,
};
use crate::keyed::KeyedRow;
use crate::keyword::sanitize_identifier;
use crate::session::ParseSession;

pub struct GenericKeyed;

impl InstrumentInterface for GenericKeyed {
    fn id(&self) -> &'static str {
        "generic.keyed"
    }

    fn title(&self) -> &'static str {
        "Generic sample/analyte/result table"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Csv, SourceFormat::Xlsx, SourceFormat::Xls]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["{keyword}"]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        Box::new(GenericKeyedParser {
            source: SourceSettings::from_options(options, ',', 0),
            columns: options.columns.clone(),
        })
    }
}

pub struct GenericKeyedParser {
    source: SourceSettings,
    columns: KeyedColumns,
}

impl InstrumentParser for GenericKeyedParser {
    fn parse(
        &mut self,
        file: &InstrumentFile,
        catalog: &dyn SampleCatalog,
        session: &mut ParseSession,
    ) -> bool {
        let columns = &self.columns;
        parse_keyed_rows(file, &self.source, session, |row, session| {
            parse_row(row, columns, catalog, session);
        })
    }
}

fn parse_row(
    row: &KeyedRow,
    columns: &KeyedColumns,
    catalog: &dyn SampleCatalog,
    session: &mut ParseSession,
) {
    let sample_id = row.value(&columns.sample);
    let derived = sanitize_identifier(row.value(&columns.analyte)).to_lowercase();
    if sample_id.is_empty() || derived.is_empty() {
        return;
    }
    let keyword = match catalog.resolve(sample_id, &derived, MatchMode::Prefix) {
        Some(AnalyteResolution::Found(keyword)) => keyword,
        None => {
            session.line_warn(format!("Sample not found for {sample_id}"), &row.describe());
            return;
        }
        Some(AnalyteResolution::Ambiguous(_)) => {
            session.line_warn(
                format!("Multiple analyses found matching keyword '{derived}'"),
                &row.describe(),
            );
            return;
        }
        Some(AnalyteResolution::NotFound) => {
            session.line_warn(
                format!("No analysis found matching keyword '{derived}'"),
                &row.describe(),
            );
            return;
        }
    };
    let Some(value) = session.coerce(&columns.result, row.value(&columns.result), &row.describe())
    else {
        return;
    };
    let record = FieldRecord::with_default_result(keyword.as_str())
        .with_remarks("")
        .with_field(keyword.as_str(), value);
    session.add_result(sample_id, &keyword, record);
}
