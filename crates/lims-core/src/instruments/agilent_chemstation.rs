//! Agilent ChemStation report workbooks.
//!
//! The report sheet opens with a header block naming the sample
//! (`Sample Name: <id>`) followed by a compound table.

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::keyword::format_keyword;
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

const SAMPLE_PREFIX: &str = "Sample Name:";
const TABLE_HEADER: &str = "Comp #";
const COMPOUND: usize = 1;

const INTERIMS: &[(&str, usize)] = &[("Amount", 4), ("ReturnTime", 2), ("Area", 3), ("QVal", 6)];

pub struct ChemStation;

impl InstrumentInterface for ChemStation {
    fn id(&self) -> &'static str {
        "agilent.chemstation"
    }

    fn title(&self) -> &'static str {
        "Agilent ChemStation"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Xls, SourceFormat::Xlsx]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["Amount", "ReturnTime", "Area", "QVal"]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, '|', 2);
        Box::new(LineDriven::new(
            ChemStationParser::new(source.delimiter),
            source,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct ChemStationParser {
    delimiter: char,
    end_header: bool,
    sample_id: Option<String>,
}

impl ChemStationParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            end_header: false,
            sample_id: None,
        }
    }

    pub fn sample_id(&self) -> Option<&str> {
        self.sample_id.as_deref()
    }

    fn parse_header(&mut self, tokens: &Tokens<'_>) {
        // Workbook sheets lose their blank rows; the compound table header ends
        // the block as well.
        if tokens.is_blank() || tokens.first() == TABLE_HEADER {
            self.end_header = true;
        }
        if let Some(rest) = tokens.first().strip_prefix(SAMPLE_PREFIX) {
            let sample_id = rest.split(':').next().unwrap_or_default().trim();
            self.sample_id = Some(sample_id.to_string());
        }
    }

    fn parse_result(
        sample_id: &str,
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<(), MissingColumn> {
        let keyword = format_keyword(tokens.column(COMPOUND)?);
        let mut record = FieldRecord::new().with_remarks("");
        for (field, column) in INTERIMS {
            if let Some(value) = session.coerce(field, tokens.column(*column)?, line) {
                record.set(*field, value);
            }
        }
        session.add_result(sample_id, &keyword, record);
        Ok(())
    }
}

impl LineParser for ChemStationParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let tokens = Tokens::split(line, self.delimiter);
        if !self.end_header {
            self.parse_header(&tokens);
            return LineInstruction::Continue;
        }
        if tokens.is_blank() || tokens.first() == TABLE_HEADER {
            return LineInstruction::Continue;
        }
        let Some(sample_id) = self.sample_id.as_deref() else {
            session.line_error("No sample name found before the compound table", line);
            return LineInstruction::Abort;
        };
        if let Err(missing) = Self::parse_result(sample_id, &tokens, line, session) {
            session.line_error(missing.to_string(), line);
        }
        LineInstruction::Continue
    }
}
