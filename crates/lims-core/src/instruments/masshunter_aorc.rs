//! Agilent MassHunter AORC confirmation reports.
//!
//! Reports list molecules per laboratory number. Each molecule block
//! accumulates retention times and ion ratios until the calculation
//! parameters marker, which flushes one record.

use lims_model::{FieldRecord, ParserOptions, SourceFormat};

use crate::driver::{LineInstruction, LineParser};
use crate::instruments::{InstrumentInterface, InstrumentParser, LineDriven, SourceSettings};
use crate::keyword::format_keyword;
use crate::session::ParseSession;
use crate::tokens::{MissingColumn, Tokens};

const SAMPLE_ROW: &str = "Laboratory number";
const MOLECULE_ROW: &str = "Molecule";
const RETENTION_ROW: &str = "Retention time in the molecule";
const FLUSH_MARKER: &str = "PARAMETERS TO BE CONSIDERED FOR THE CALCULATION";

pub struct MassHunterAorc;

impl InstrumentInterface for MassHunterAorc {
    fn id(&self) -> &'static str {
        "agilent.masshunter.aorc"
    }

    fn title(&self) -> &'static str {
        "Quanti AORC"
    }

    fn accepted_formats(&self) -> &'static [SourceFormat] {
        &[SourceFormat::Xls, SourceFormat::Xlsx]
    }

    fn field_names(&self) -> &'static [&'static str] {
        &[
            "RetentionTime",
            "RetentionTimeRef",
            "Ion{n}mzmax",
            "Ion{n}mzmin",
            "Ion{n}Area",
            "Ion{n}AreaRef",
            "Ion{n}SigNseRat",
            "DateTime",
        ]
    }

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser> {
        let source = SourceSettings::from_options(options, '|', 0);
        Box::new(LineDriven::new(AorcParser::new(source.delimiter), source))
    }
}

#[derive(Debug, Clone)]
pub struct AorcParser {
    delimiter: char,
    sample_id: Option<String>,
    keyword: Option<String>,
    retention_time: Option<String>,
    retention_time_ref: Option<String>,
    /// Raw ion values of the current molecule, in report order.
    ions: Vec<(String, String)>,
}

impl AorcParser {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            sample_id: None,
            keyword: None,
            retention_time: None,
            retention_time_ref: None,
            ions: Vec::new(),
        }
    }

    fn clear_molecule(&mut self) {
        self.retention_time = None;
        self.retention_time_ref = None;
        self.ions.clear();
    }

    fn buffer_ion(&mut self, tokens: &Tokens<'_>) -> Result<(), MissingColumn> {
        let number = tokens.first().split(' ').nth(1).unwrap_or_default();
        let mut mz = tokens.column(1)?.split("---").map(str::trim);
        let mz_max = mz.next().unwrap_or_default();
        let mz_min = mz.next().unwrap_or_default();
        let values = [
            (format!("Ion{number}mzmax"), mz_max.to_string()),
            (format!("Ion{number}mzmin"), mz_min.to_string()),
            (format!("Ion{number}Area"), tokens.column(2)?.to_string()),
            (format!("Ion{number}AreaRef"), tokens.column(3)?.to_string()),
            (format!("Ion{number}SigNseRat"), tokens.column(4)?.to_string()),
        ];
        self.ions.extend(values);
        Ok(())
    }

    fn flush(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let (Some(sample_id), Some(keyword)) = (self.sample_id.clone(), self.keyword.clone())
        else {
            session.line_error(
                "Calculation parameters found before a laboratory number and molecule",
                line,
            );
            return LineInstruction::Abort;
        };
        let mut record = FieldRecord::new()
            .with_remarks("")
            .with_field("DateTime", session.parsed_at_text());
        let retention = [
            ("RetentionTime", self.retention_time.as_deref()),
            ("RetentionTimeRef", self.retention_time_ref.as_deref()),
        ];
        for (field, raw) in retention {
            if let Some(value) = session.coerce(field, raw.unwrap_or_default(), line) {
                record.set(field, value);
            }
        }
        for (field, raw) in &self.ions {
            if let Some(value) = session.coerce(field, raw, line) {
                record.set(field.as_str(), value);
            }
        }
        session.add_result(&sample_id, &keyword, record);
        self.clear_molecule();
        LineInstruction::Continue
    }

    fn parse_tokens(
        &mut self,
        tokens: &Tokens<'_>,
        line: &str,
        session: &mut ParseSession,
    ) -> Result<LineInstruction, MissingColumn> {
        if tokens.is_blank() {
            return Ok(LineInstruction::Continue);
        }
        match tokens.first() {
            SAMPLE_ROW => self.sample_id = Some(tokens.column(2)?.to_string()),
            MOLECULE_ROW => {
                self.keyword = Some(format_keyword(tokens.column(2)?));
                self.clear_molecule();
            }
            RETENTION_ROW => {
                let value = tokens.column(1)?.to_string();
                if self.retention_time.is_some() {
                    self.retention_time_ref = Some(value);
                } else {
                    self.retention_time = Some(value);
                }
            }
            FLUSH_MARKER => return Ok(self.flush(line, session)),
            first if first.starts_with("ion") => self.buffer_ion(tokens)?,
            _ => {}
        }
        Ok(LineInstruction::Continue)
    }
}

impl LineParser for AorcParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
        let tokens = Tokens::split(line, self.delimiter);
        match self.parse_tokens(&tokens, line, session) {
            Ok(instruction) => instruction,
            Err(missing) => {
                session.line_error(missing.to_string(), line);
                LineInstruction::Continue
            }
        }
    }
}
