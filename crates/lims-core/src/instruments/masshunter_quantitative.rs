//! Agilent MassHunter Quantitative Analysis batch tables (CSV).
//!
//! The compound is named once in the header row; every following row is one
//! sample's quantitation of that compound.

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::keyword::format_keyword;
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

const SAMPLE: usize = 2;
const ACQUIRED_AT: usize = 6;
const COMPOUND_HEADER: usize = 7;

const INTERIMS: &[(&str, usize)] = &[
    ("ReturnTime", 8),
    ("Resp", 9),
    ("CalcConc", 10),
    ("FinalConc", 11),
    ("Accuracy", 12),
    ("Ratio", 13),
    ("MI", 14),
];

/// Keyword named by a MassHunter batch header row, if `tokens` is one.
///
/// Header rows start with `Sample`; column 7 holds `<Compound> Results`.
pub(crate) fn header_keyword(tokens: &Tokens<'_>) -> Result<Option<String>, MissingColumn> {
    if !tokens.first().starts_with("Sample") {
        return Ok(None);
    }
    let compound = tokens.column(COMPOUND_HEADER)?;
    let first_word = compound.split(' ').next().unwrap_or_default();
    Ok(Some(format_keyword(first_word)))
}

/// Column header rows repeat `Name` in the sample column.
pub(crate) fn is_column_header(tokens: &Tokens<'_>) -> bool {
    tokens.get(SAMPLE) == Some("Name")
}

pub struct MassHunterQuantitative;

impl InstrumentInterface for MassHunterQuantitative {
    fn id(&self) -> &'static str {
        "agilent.masshunter.quantitative"
    }

    fn title(&self) -> &'static str {
        "Agilent MassHunter Quantitative"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Csv]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "ReturnTime",
            "Resp",
            "CalcConc",
            "FinalConc",
            "Accuracy",
            "Ratio",
            "MI",
            "DateTime",
        ]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, ',', 0);
        Box::new(LineDriven::new(
            QuantitativeParser::new(source.delimiter),
            source,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct QuantitativeParser {
    delimiter: char,
    keyword: Option<String>,
}

impl QuantitativeParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            keyword: None,
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    fn parse_result(
        keyword: &str,
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<(), MissingColumn> {
        if tokens.is_blank() || is_column_header(tokens) {
            return Ok(());
        }
        let sample_id = tokens.column(SAMPLE)?;
        let mut record = FieldRecord::new()
            .with_remarks("")
            .with_field("DateTime", tokens.column(ACQUIRED_AT)?);
        for (field, column) in INTERIMS {
            if let Some(value) = session.coerce(field, tokens.column(*column)?, line) {
                record.set(*field, value);
            }
        }
        session.add_result(sample_id, keyword, record);
        Ok(())
    }
}

impl LineParser for QuantitativeParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let tokens = Tokens::split(line, self.delimiter);
        let outcome = if let Some(keyword) = self.keyword.as_deref() {
            Self::parse_result(keyword, &tokens, line, session)
        } else {
            header_keyword(&tokens).map(|keyword| self.keyword = keyword)
        };
        if let Err(missing) = outcome {
            session.line_error(missing.to_string(), line);
        }
        LineInstruction::Continue
    }
}
