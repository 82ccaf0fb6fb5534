//! Instrument file ingestion.
//!
//! Uploads arrive as a filename plus bytes. Workbooks (`.xlsx`, `.xls`) are
//! flattened into delimiter-joined text lines; CSV files pass through as
//! text. Vendor parsers only ever see normalized lines.

pub mod catalog;
pub mod error;
pub mod file;
pub mod text;
pub mod transcode;
pub mod workbook;

pub use catalog::load_catalog;
pub use error::{IngestError, Result};
pub use file::InstrumentFile;
pub use text::decode_lines;
pub use transcode::{TranscodeStrategy, transcode};
pub use workbook::{normalize_workbook, render_cell};
