//! Vendor instrument result parsers and the import controller.
//!
//! An import normalizes the uploaded file into text lines, runs the vendor
//! parser selected by interface id, and returns the accumulated raw results
//! together with an errors/log/warnings summary.

pub mod coerce;
pub mod driver;
pub mod error;
pub mod import;
pub mod instruments;
pub mod keyed;
pub mod keyword;
pub mod session;
pub mod tokens;

pub use coerce::{
    InvalidResultValue, clamp_reading, coerce_result, extract_number, parse_number,
};
pub use driver::{LineInstruction, LineParser, drive_lines};
pub use error::{ImportError, Result};
pub use import::{ImportOutcome, Importer, check_policy, import_file};
pub use instruments::{
    InstrumentInterface, InstrumentParser, InstrumentRegistry, LineDriven, SourceSettings,
    default_registry,
};
pub use keyed::{KeyedRow, read_keyed_rows};
pub use keyword::{format_keyword, sanitize_identifier, strip_non_word};
pub use session::ParseSession;
pub use tokens::{MissingColumn, Tokens};
