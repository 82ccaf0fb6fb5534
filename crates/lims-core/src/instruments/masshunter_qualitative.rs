//! Agilent MassHunter Qualitative Analysis compound reports (CSV).

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::keyword::format_keyword;
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

const SAMPLE: usize = 104;
const COMPOUND: usize = 18;
const RESULT_FIELD: &str = "mzProd";
const RESULT_COLUMN: usize = 68;

/// Interims read as numbers.
const NUMERIC_INTERIMS: &[(&str, usize)] = &[
    ("Area", 48),
    ("End", 55),
    ("mz", 67),
    ("ReturnTime", 69),
    ("Start", 71),
    ("Width", 72),
];

/// Interims kept as text.
const TEXT_INTERIMS: &[(&str, usize)] = &[("Label", 22), ("File", 54), ("AcqMethod", 110)];

pub struct MassHunterQualitative;

impl InstrumentInterface for MassHunterQualitative {
    fn id(&self) -> &'static str {
        "agilent.masshunter.qualitative"
    }

    fn title(&self) -> &'static str {
        "Agilent MassHunter Qualitative"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            RESULT_FIELD,
            "Label",
            "Area",
            "File",
            "End",
            "mz",
            "ReturnTime",
            "Start",
            "Width",
            "AcqMethod",
            "DateTime",
        ]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, ',', 0);
        Box::new(LineDriven::new(
            QualitativeParser::new(source.delimiter),
            source,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct QualitativeParser {
    delimiter: char,
    end_header: bool,
    column_headers: Vec<String>,
}

impl QualitativeParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            end_header: false,
            column_headers: Vec::new(),
        }
    }

    /// Column header row of the results table, once seen.
    pub fn column_headers(&self) -> &[String] {
        &self.column_headers
    }

    fn parse_result(
        &mut self,
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<(), MissingColumn> {
        if tokens.is_blank() {
            return Ok(());
        }
        if tokens.first().starts_with("Score") {
            self.column_headers = tokens
                .between(0, 0)
                .iter()
                .map(|token| (*token).to_string())
                .collect();
            return Ok(());
        }

        let sample_id = tokens.column(SAMPLE)?;
        let keyword = format_keyword(tokens.column(COMPOUND)?);
        let mut record = FieldRecord::with_default_result(RESULT_FIELD)
            .with_remarks("")
            .with_field("DateTime", session.parsed_at_text());
        if let Some(value) = session.coerce(RESULT_FIELD, tokens.column(RESULT_COLUMN)?, line) {
            record.set(RESULT_FIELD, value);
        }
        for (field, column) in NUMERIC_INTERIMS {
            if let Some(value) = session.coerce(field, tokens.column(*column)?, line) {
                record.set(*field, value);
            }
        }
        for (field, column) in TEXT_INTERIMS {
            record.set(*field, tokens.column(*column)?);
        }
        session.add_result(sample_id, &keyword, record);
        Ok(())
    }
}

impl LineParser for QualitativeParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let tokens = Tokens::split(line, self.delimiter);
        if !self.end_header {
            self.end_header = tokens.is_blank();
            return LineInstruction::Continue;
        }
        if let Err(missing) = self.parse_result(&tokens, line, session) {
            session.line_error(missing.to_string(), line);
        }
        LineInstruction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(usize, &str)]) -> String {
        let mut tokens = vec![String::new(); 111];
        for (index, value) in cells {
            tokens[*index] = (*value).to_string();
        }
        tokens.join(",")
    }

    #[test]
    fn header_ends_at_first_empty_row() {
        let mut parser = QualitativeParser::new(',');
        let mut session = ParseSession::new("qual.csv");
        parser.parse_line("Compound Report,,", &mut session);
        assert!(!parser.end_header);
        parser.parse_line(",,,", &mut session);
        assert!(parser.end_header);
        parser.parse_line("Score (Tgt),Cpd,Label", &mut session);
        assert_eq!(parser.column_headers()[0], "Score (Tgt)");
        assert!(session.results().is_empty());
    }

    #[test]
    fn result_row_carries_text_and_numeric_interims() {
        let mut parser = QualitativeParser::new(',');
        parser.end_header = true;
        let mut session = ParseSession::new("qual.csv");
        let line = row(&[
            (0, "98.5"),
            (18, "Caffeine (std)"),
            (22, "Cpd 1"),
            (48, "15234"),
            (54, "run-01.d"),
            (68, "138.06"),
            (69, "4.21"),
            (104, "W-17"),
            (110, "caffeine.m"),
        ]);
        parser.parse_line(&line, &mut session);
        let record = session.results().get("W-17", "Caffeinestd").expect("record");
        assert_eq!(record.default_result.as_deref(), Some("mzProd"));
        assert_eq!(record.number("mzProd"), Some(138.06));
        assert_eq!(record.number("Area"), Some(15234.0));
        assert_eq!(record.number("Width"), Some(0.0));
        assert_eq!(record.text("Label"), Some("Cpd 1"));
        assert_eq!(record.text("AcqMethod"), Some("caffeine.m"));
        assert!(session.summary().errors.is_empty());
    }

    #[test]
    fn short_result_row_is_an_error() {
        let mut parser = QualitativeParser::new(',');
        parser.end_header = true;
        let mut session = ParseSession::new("qual.csv");
        parser.parse_line("98.5,x,y", &mut session);
        assert_eq!(session.summary().errors[0].message, "Missing column 104");
    }
}
