//! Shared data model for instrument result import and worklist export.

pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod resolution;
pub mod results;
pub mod source;
pub mod worklist;

pub use catalog::{MemoryCatalog, OpenCatalog, SampleCatalog};
pub use diagnostics::{Diagnostic, ImportSummary, Severity};
pub use error::{LimsError, Result};
pub use options::{KeyedColumns, ParserOptions, ResultUnit};
pub use resolution::{AnalyteResolution, MatchMode, resolve_analyte};
pub use results::{DEFAULT_RESULT_FIELD, FieldRecord, FieldValue, REMARKS_FIELD, RawResults};
pub use source::{SourceFormat, WorksheetSelector};
pub use worklist::{Worklist, WorklistEntry};
