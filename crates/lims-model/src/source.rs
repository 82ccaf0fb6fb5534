//! Source file formats and worksheet selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LimsError;

/// Container format of an uploaded instrument file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Xls => "xls",
            SourceFormat::Csv => "csv",
        }
    }

    /// Format implied by the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::from_hint(extension)
    }

    /// Format named by a free-text hint such as `"xlsx"` or `".CSV"`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xlsx" => Some(SourceFormat::Xlsx),
            "xls" => Some(SourceFormat::Xls),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    pub fn is_workbook(self) -> bool {
        matches!(self, SourceFormat::Xlsx | SourceFormat::Xls)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = LimsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hint(value).ok_or_else(|| LimsError::UnknownFormat(value.to_string()))
    }
}

/// Worksheet addressed by zero-based index or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorksheetSelector {
    Index(usize),
    Name(String),
}

impl Default for WorksheetSelector {
    fn default() -> Self {
        WorksheetSelector::Index(0)
    }
}

impl WorksheetSelector {
    /// Position of the selected sheet among `sheet_names`.
    ///
    /// An exact name match wins; a name that parses as an integer falls back
    /// to that index.
    pub fn resolve<S: AsRef<str>>(&self, sheet_names: &[S]) -> Option<usize> {
        match self {
            WorksheetSelector::Index(index) => (*index < sheet_names.len()).then_some(*index),
            WorksheetSelector::Name(name) => sheet_names
                .iter()
                .position(|sheet| sheet.as_ref() == name)
                .or_else(|| {
                    name.trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|index| *index < sheet_names.len())
                }),
        }
    }
}

impl fmt::Display for WorksheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorksheetSelector::Index(index) => write!(f, "{index}"),
            WorksheetSelector::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for WorksheetSelector {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().parse::<usize>() {
            Ok(index) => WorksheetSelector::Index(index),
            Err(_) => WorksheetSelector::Name(value.to_string()),
        })
    }
}

impl From<usize> for WorksheetSelector {
    fn from(index: usize) -> Self {
        WorksheetSelector::Index(index)
    }
}

impl From<&str> for WorksheetSelector {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(selector) => selector,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_filename_is_case_insensitive() {
        assert_eq!(SourceFormat::from_filename("Run-01.XLSX"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_filename("run.xls"), Some(SourceFormat::Xls));
        assert_eq!(SourceFormat::from_filename("run.csv"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_filename("run.ods"), None);
        assert_eq!(SourceFormat::from_filename("noextension"), None);
    }

    #[test]
    fn selector_parses_integers_as_index() {
        assert_eq!(WorksheetSelector::from("2"), WorksheetSelector::Index(2));
        assert_eq!(
            WorksheetSelector::from("Results"),
            WorksheetSelector::Name("Results".to_string())
        );
    }

    #[test]
    fn selector_prefers_exact_name() {
        let sheets = ["Summary", "1", "Data"];
        assert_eq!(WorksheetSelector::Name("1".into()).resolve(&sheets), Some(1));
        assert_eq!(WorksheetSelector::Name("2".into()).resolve(&sheets), Some(2));
        assert_eq!(WorksheetSelector::Name("Data".into()).resolve(&sheets), Some(2));
        assert_eq!(WorksheetSelector::Name("NoSuchSheet".into()).resolve(&sheets), None);
        assert_eq!(WorksheetSelector::Index(3).resolve(&sheets), None);
    }
}
