//! Bruker MALDI Biotyper identification reports (CSV).
//!
//! Each row names a sample, the best-matching organism and its score. The
//! organism becomes the keyword and the score its result.

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::keyword::format_keyword;
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

const SAMPLE: usize = 0;
const ORGANISM: usize = 3;
const SCORE: usize = 5;

pub struct MaldiBiotyper;

impl InstrumentInterface for MaldiBiotyper {
    fn id(&self) -> &'static str {
        "maldibiotyper"
    }

    fn title(&self) -> &'static str {
        "Bruker MALDI Biotyper"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &["{keyword}"]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, ',', 0);
        Box::new(LineDriven::new(MaldiParser::new(source.delimiter), source))
    }
}

#[derive(Debug, Clone)]
pub struct MaldiParser {
    delimiter: char,
}

impl MaldiParser {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    fn parse_tokens(
        &self,
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<(), MissingColumn> {
        if tokens.is_blank() {
            return Ok(());
        }
        let sample_id = tokens.column(SAMPLE)?;
        let keyword = format_keyword(tokens.column(ORGANISM)?);
        let score = tokens.column(SCORE)?;
        let Some(value) = session.coerce(&keyword, score, line) else {
            return Ok(());
        };
        let record = FieldRecord::with_default_result(keyword.as_str())
            .with_remarks("")
            .with_field(keyword.as_str(), value);
        session.add_result(sample_id, &keyword, record);
        Ok(())
    }
}

impl LineParser for MaldiParser {
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

    #[test]
    fn organism_becomes_the_keyword() {
        let mut parser = MaldiParser::new(',');
        let mut session = ParseSession::new("biotyper.csv");
        parser.parse_line(
            "H-0042,Urine,Staphylococcus aureus,Staph. aureus,(+++),2.31,E. coli,1.2",
            &mut session,
        );
        let record = session.results().get("H-0042", "Staphaureus").expect("record");
        assert_eq!(record.default_result.as_deref(), Some("Staphaureus"));
        assert_eq!(record.number("Staphaureus"), Some(2.31));
        assert_eq!(record.remarks, "");
    }

    #[test]
    fn unreadable_score_is_an_error_and_no_record() {
        let mut parser = MaldiParser::new(',');
        let mut session = ParseSession::new("biotyper.csv");
        parser.parse_line("Sample,Type,Match,Organism,Info,Score", &mut session);
        assert!(session.results().is_empty());
        assert_eq!(
            session.summary().errors[0].message,
            "No valid number Score in column (Organism)"
        );
    }
}
