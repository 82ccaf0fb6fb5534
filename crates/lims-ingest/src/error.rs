//! Error types for instrument file ingestion.

use std::path::PathBuf;

use lims_model::{SourceFormat, WorksheetSelector};
use thiserror::Error;

/// Errors that can occur while turning an upload into normalized lines.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    /// The requested worksheet does not exist in the workbook.
    #[error("Sheet not found in workbook: {selector}")]
    SheetNotFound {
        selector: WorksheetSelector,
        available: Vec<String>,
    },

    /// The bytes could not be opened with this reader.
    #[error("not a valid {format} workbook: {message}")]
    FormatMismatch {
        format: SourceFormat,
        message: String,
    },

    /// Every transcoding strategy failed.
    #[error("Can't parse input file as XLS, XLSX, or CSV.")]
    Unreadable,

    /// The filename carries no recognised extension and no format was given.
    #[error("Unrecognized file format {0}")]
    UnknownFormat(String),

    // === Catalog Errors ===
    /// Catalog file is not valid JSON.
    #[error("invalid catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestError {
    /// Whether the next transcoding strategy may still succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IngestError::FormatMismatch { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::SheetNotFound {
            selector: WorksheetSelector::Name("NoSuchSheet".to_string()),
            available: vec!["Sheet1".to_string()],
        };
        assert_eq!(err.to_string(), "Sheet not found in workbook: NoSuchSheet");
        assert_eq!(
            IngestError::Unreadable.to_string(),
            "Can't parse input file as XLS, XLSX, or CSV."
        );
    }

    #[test]
    fn only_format_mismatch_is_recoverable() {
        let mismatch = IngestError::FormatMismatch {
            format: SourceFormat::Xls,
            message: "bad header".to_string(),
        };
        assert!(mismatch.is_recoverable());
        assert!(!IngestError::Unreadable.is_recoverable());
    }
}
