//! Options handed to a vendor parser when it is constructed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LimsError;
use crate::source::{SourceFormat, WorksheetSelector};

/// Preferred unit for instruments that report both percent and ppm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultUnit {
    #[default]
    Pct,
    Ppm,
}

impl ResultUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultUnit::Pct => "pct",
            ResultUnit::Ppm => "ppm",
        }
    }
}

impl fmt::Display for ResultUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultUnit {
    type Err = LimsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pct" | "%" => Ok(ResultUnit::Pct),
            "ppm" => Ok(ResultUnit::Ppm),
            _ => Err(LimsError::UnknownUnit(value.to_string())),
        }
    }
}

/// Header names used by keyed-row adapters that read a plain
/// sample/analyte/result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyedColumns {
    pub sample: String,
    pub analyte: String,
    pub result: String,
}

impl Default for KeyedColumns {
    fn default() -> Self {
        Self {
            sample: "Sample".to_string(),
            analyte: "Analyte".to_string(),
            result: "Result".to_string(),
        }
    }
}

/// Per-import parser configuration.
///
/// Every field is optional; an adapter falls back to its own default
/// delimiter, worksheet and format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub delimiter: Option<char>,
    pub worksheet: Option<WorksheetSelector>,
    pub unit: ResultUnit,
    pub format: Option<SourceFormat>,
    pub columns: KeyedColumns,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub fn with_worksheet(mut self, worksheet: impl Into<WorksheetSelector>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: ResultUnit) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: KeyedColumns) -> Self {
        self.columns = columns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParserOptions =
            serde_json::from_str(r#"{"delimiter": ";", "worksheet": "Data", "unit": "ppm"}"#)
                .expect("options");
        assert_eq!(options.delimiter, Some(';'));
        assert_eq!(options.worksheet, Some(WorksheetSelector::Name("Data".into())));
        assert_eq!(options.unit, ResultUnit::Ppm);
        assert_eq!(options.format, None);
        assert_eq!(options.columns, KeyedColumns::default());
    }

    #[test]
    fn unit_parses_case_insensitive() {
        assert_eq!("PPM".parse::<ResultUnit>().ok(), Some(ResultUnit::Ppm));
        assert!("mg/l".parse::<ResultUnit>().is_err());
    }
}
