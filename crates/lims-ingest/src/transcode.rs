//! Ordered transcoding strategies with typed failures.
//!
//! A workbook upload is tried with the reader its extension suggests first
//! and the other legacy reader second. A missing worksheet stops the chain
//! immediately; a reader that cannot open the bytes hands over to the next.

use lims_model::{SourceFormat, WorksheetSelector};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::file::InstrumentFile;
use crate::text::decode_lines;
use crate::workbook::normalize_workbook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeStrategy {
    Workbook(SourceFormat),
    Passthrough,
}

impl TranscodeStrategy {
    /// Strategy order for a file of `format`.
    pub fn order_for(format: SourceFormat) -> Vec<TranscodeStrategy> {
        match format {
            SourceFormat::Xlsx => vec![
                TranscodeStrategy::Workbook(SourceFormat::Xlsx),
                TranscodeStrategy::Workbook(SourceFormat::Xls),
            ],
            SourceFormat::Xls => vec![
                TranscodeStrategy::Workbook(SourceFormat::Xls),
                TranscodeStrategy::Workbook(SourceFormat::Xlsx),
            ],
            SourceFormat::Csv => vec![TranscodeStrategy::Passthrough],
        }
    }

    pub fn apply(
        self,
        bytes: &[u8],
        selector: &WorksheetSelector,
        delimiter: char,
    ) -> Result<Vec<String>> {
        match self {
            TranscodeStrategy::Workbook(format) => {
                normalize_workbook(bytes, format, selector, delimiter)
            }
            TranscodeStrategy::Passthrough => Ok(decode_lines(bytes)),
        }
    }
}

/// Turn `file` into normalized lines.
///
/// `format` overrides the extension; without either the upload is rejected.
pub fn transcode(
    file: &InstrumentFile,
    format: Option<SourceFormat>,
    selector: &WorksheetSelector,
    delimiter: char,
) -> Result<Vec<String>> {
    let format = format
        .or_else(|| file.extension_format())
        .ok_or_else(|| IngestError::UnknownFormat(file.basename().to_string()))?;
    for strategy in TranscodeStrategy::order_for(format) {
        match strategy.apply(&file.bytes, selector, delimiter) {
            Ok(lines) => {
                debug!(
                    filename = %file.filename,
                    strategy = ?strategy,
                    line_count = lines.len(),
                    "transcoded instrument file"
                );
                return Ok(lines);
            }
            Err(error) if error.is_recoverable() => {
                debug!(filename = %file.filename, strategy = ?strategy, %error, "strategy failed");
            }
            Err(error) => return Err(error),
        }
    }
    warn!(filename = %file.filename, "no strategy could read the file");
    Err(IngestError::Unreadable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_order_follows_extension() {
        assert_eq!(
            TranscodeStrategy::order_for(SourceFormat::Xls),
            vec![
                TranscodeStrategy::Workbook(SourceFormat::Xls),
                TranscodeStrategy::Workbook(SourceFormat::Xlsx)
            ]
        );
        assert_eq!(
            TranscodeStrategy::order_for(SourceFormat::Csv),
            vec![TranscodeStrategy::Passthrough]
        );
    }

    #[test]
    fn unreadable_after_all_strategies_fail() {
        let file = InstrumentFile::new("broken.xlsx", b"plain text".to_vec());
        let error = transcode(&file, None, &WorksheetSelector::default(), ',').expect_err("broken");
        assert!(matches!(error, IngestError::Unreadable));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = InstrumentFile::new("results.txt", b"a,b".to_vec());
        let error = transcode(&file, None, &WorksheetSelector::default(), ',').expect_err("txt");
        assert!(matches!(error, IngestError::UnknownFormat(_)));
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let file = InstrumentFile::new("results.txt", b"a,b\nc,d".to_vec());
        let lines = transcode(
            &file,
            Some(SourceFormat::Csv),
            &WorksheetSelector::default(),
            ',',
        )
        .expect("lines");
        assert_eq!(lines, vec!["a,b", "c,d"]);
    }
}
