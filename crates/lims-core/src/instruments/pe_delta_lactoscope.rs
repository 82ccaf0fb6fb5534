//! PerkinElmer Delta LactoScope workbook exports.
//!
//! Blocks repeat per sample: a two-cell row naming the sample, a keyword row,
//! a unit row, then statistics rows of which only `Mean` carries results.

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::keyword::format_keyword;
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

/// Statistics rows that carry no results.
const SKIPPED_ROWS: &[&str] = &["StdDev", "Version", "Slope", "Intercept", "Calibrated"];

/// Trailing columns after the readings: sample id, operator, timestamp.
const TRAILING: usize = 3;
const FIRST_READING: usize = 4;

pub struct DeltaLactoscope;

impl InstrumentInterface for DeltaLactoscope {
    fn id(&self) -> &'static str {
        "pedeltalactoscope"
    }

    fn title(&self) -> &'static str {
        "PE Delta LactoScope"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Xls, SourceFormat::Xlsx]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["{keyword}", "DateTime"]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, '|', 0);
        Box::new(LineDriven::new(
            LactoscopeParser::new(source.delimiter),
            source,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct LactoscopeParser {
    delimiter: char,
    sample_id: Option<String>,
    keywords: Vec<String>,
    units: Vec<String>,
}

impl LactoscopeParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            sample_id: None,
            keywords: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Unit row of the current block, as read.
    pub fn units(&self) -> &[String] {
        &self.units
    }

    fn parse_tokens(
        &mut self,
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<(), MissingColumn> {
        if tokens.is_blank() {
            return Ok(());
        }
        if tokens.filled() == 2 {
            self.sample_id = Some(tokens.column(3)?.to_string());
            return Ok(());
        }
        if self.keywords.is_empty() && self.sample_id.is_some() {
            self.keywords = tokens
                .between(FIRST_READING, TRAILING)
                .iter()
                .map(|token| format_keyword(token))
                .collect();
            return Ok(());
        }
        if self.units.is_empty() {
            self.units = tokens
                .between(FIRST_READING, TRAILING)
                .iter()
                .map(|token| (*token).to_string())
                .collect();
            return Ok(());
        }

        let label = tokens.column(3)?;
        if label.starts_with('#') || SKIPPED_ROWS.contains(&label) {
            return Ok(());
        }
        if label == "Mean" {
            let sample_id = tokens.from_end(TRAILING)?;
            let timestamp = tokens.from_end(1)?;
            let readings = tokens.between(FIRST_READING, TRAILING);
            for (keyword, raw) in self.keywords.iter().zip(readings) {
                let mut record = FieldRecord::with_default_result(keyword.as_str())
                    .with_field("DateTime", timestamp);
                if let Some(value) = session.coerce(keyword, raw, line) {
                    record.set(keyword.as_str(), value);
                }
                session.add_result(sample_id, keyword, record);
            }
            self.sample_id = None;
            self.keywords.clear();
            self.units.clear();
        }
        // Operator rows ("Lab Manager" in column 2) and anything else fall through.
        Ok(())
    }
}

impl LineParser for LactoscopeParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let tokens = Tokens::split(line, self.delimiter);
        if let Err(missing) = self.parse_tokens(&tokens, line, session) {
            session.line_error(missing.to_string(), line);
        }
        LineInstruction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::drive_lines;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|line| (*line).to_string()).collect()
    }

    #[test]
    fn mean_row_yields_one_record_per_keyword() {
        let mut parser = LactoscopeParser::new('|');
        let mut session = ParseSession::new("milk.xlsx");
        let ok = drive_lines(
            &mut parser,
            &lines(&[
                "|||M-001|Milk||||",
                "||||Fat|Protein %|Lactose|||",
                "||||%|%|%|||",
                "|||#1|3.9|3.2|4.8|M-001|Lab Manager|2024-03-01 10:12",
                "|||Mean|3.95|3.25|ND|M-001|Lab Manager|2024-03-01 10:14",
                "|||StdDev|0.05|0.05|0|M-001|Lab Manager|2024-03-01 10:14",
            ]),
            &mut session,
        );
        assert!(ok);
        let fat = session.results().get("M-001", "Fat").expect("fat");
        assert_eq!(fat.default_result.as_deref(), Some("Fat"));
        assert_eq!(fat.number("Fat"), Some(3.95));
        assert_eq!(fat.text("DateTime"), Some("2024-03-01 10:14"));
        let lactose = session.results().get("M-001", "Lactose").expect("lactose");
        assert_eq!(lactose.number("Lactose"), Some(0.0));
        assert!(session.results().get("M-001", "Protein").is_some());
    }

    #[test]
    fn short_rows_are_reported_not_fatal() {
        let mut parser = LactoscopeParser::new('|');
        parser.sample_id = Some("M-001".to_string());
        parser.keywords = vec!["Fat".to_string()];
        parser.units = vec!["%".to_string()];
        let mut session = ParseSession::new("milk.xlsx");
        session.set_line_number(7);
        let instruction = parser.parse_line("a|b|c", &mut session);
        assert_eq!(instruction, LineInstruction::Continue);
        assert_eq!(session.summary().errors[0].message, "Missing column 3");
        assert_eq!(session.summary().errors[0].line_number, Some(7));
    }
}
