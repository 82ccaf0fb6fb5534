use std::path::PathBuf;

use lims_core::ImportOutcome;
use lims_model::ParserOptions;

/// One instrument file to import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub interface: String,
    pub file: PathBuf,
    /// JSON sample catalog; any sample is accepted without one.
    pub catalog: Option<PathBuf>,
    pub options: ParserOptions,
    /// Where to write the outcome as JSON.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub interface: String,
    pub file: PathBuf,
    pub outcome: ImportOutcome,
    pub output: Option<PathBuf>,
}

/// One worklist layout to export.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub exporter: String,
    pub worklist: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub exporter: String,
    pub worklist_id: String,
    pub samples: usize,
    pub path: PathBuf,
}
