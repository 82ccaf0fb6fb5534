//! Agilent MassHunter pesticide screening batches (CSV).
//!
//! The screened compounds are fixed; each sample row holds their retention
//! times at known columns. Records are appended, never merged.

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::masshunter_quantitative::is_column_header;
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

const SAMPLE: usize = 2;
const RESULT_FIELD: &str = "RT";

/// Screened compound keyword -> retention time column.
const SCREENED: &[(&str, usize)] = &[("Propargite", 8), ("TriphenylphosphateTPPISISTD", 11)];

pub struct MassHunterPesticide;

impl InstrumentInterface for MassHunterPesticide {
    fn id(&self) -> &'static str {
        "agilent.masshunter.pesticide"
    }

    fn title(&self) -> &'static str {
        "Agilent MassHunter Pesticide"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[RESULT_FIELD]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, ',', 0);
        Box::new(LineDriven::new(
            PesticideParser::new(source.delimiter),
            source,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct PesticideParser {
    delimiter: char,
    end_header: bool,
}

impl PesticideParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            end_header: false,
        }
    }

    fn parse_result(
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<(), MissingColumn> {
        if tokens.is_blank() || is_column_header(tokens) {
            return Ok(());
        }
        let sample_id = tokens.column(SAMPLE)?;
        // A short row imports none of its compounds.
        let readings = SCREENED
            .iter()
            .map(|(keyword, column)| tokens.column(*column).map(|raw| (*keyword, raw)))
            .collect::<Result<Vec<_>, MissingColumn>>()?;
        for (keyword, raw) in readings {
            let mut record = FieldRecord::with_default_result(RESULT_FIELD).with_remarks("");
            if let Some(value) = session.coerce(RESULT_FIELD, raw, line) {
                record.set(RESULT_FIELD, value);
            }
            session.append_result(sample_id, keyword, record);
        }
        Ok(())
    }
}

impl LineParser for PesticideParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let tokens = Tokens::split(line, self.delimiter);
        if !self.end_header {
            self.end_header = tokens.first().starts_with("Sample");
            return LineInstruction::Continue;
        }
        if let Err(missing) = Self::parse_result(&tokens, line, session) {
            session.line_error(missing.to_string(), line);
        }
        LineInstruction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_appends_one_record_per_screened_compound() {
        let mut parser = PesticideParser::new(',');
        let mut session = ParseSession::new("pest.csv");
        for line in [
            "Sample,,,,,,,,Propargite Results,,,TPP Results",
            ",,Name,Data File,Type,Level,Acq. Date-Time,Exp. RT,RT,Resp.,Exp. RT,RT",
            ",,P-7,p7.d,Sample,,2024-05-02 11:00,7.9,7.93,511,5.0,5.02",
            ",,P-7,p7b.d,Sample,,2024-05-02 11:20,7.9,7.95,498,5.0,ND",
        ] {
            parser.parse_line(line, &mut session);
        }
        let propargite = session.results().records("P-7", "Propargite");
        assert_eq!(propargite.len(), 2);
        assert_eq!(propargite[0].number("RT"), Some(7.93));
        assert_eq!(propargite[1].number("RT"), Some(7.95));
        let tpp = session.results().records("P-7", "TriphenylphosphateTPPISISTD");
        assert_eq!(tpp[1].number("RT"), Some(0.0));
        assert_eq!(tpp[0].default_result.as_deref(), Some("RT"));
    }

    #[test]
    fn short_row_imports_no_compound() {
        let mut parser = PesticideParser::new(',');
        let mut session = ParseSession::new("pest.csv");
        for (number, line) in [
            "Sample,,,,,,,,Propargite Results,,,TPP Results",
            ",,P-8,p8.d,Sample,,2024-05-02 11:00,7.9,7.93,511",
        ]
        .into_iter()
        .enumerate()
        {
            session.set_line_number(number + 1);
            parser.parse_line(line, &mut session);
        }
        assert!(session.results().records("P-8", "Propargite").is_empty());
        assert!(!session.results().contains_sample("P-8"));
        let errors: Vec<String> = session
            .summary()
            .errors
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(errors, vec!["Line 2: Missing column 11"]);
    }
}
