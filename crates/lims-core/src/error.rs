use lims_ingest::IngestError;
use thiserror::Error;

/// Policy-level failures raised before a parser ever runs.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No file selected")]
    NoFileSelected,
    #[error("Unrecognized file format {0}")]
    UnrecognizedFormat(String),
    #[error("unknown instrument interface: {0}")]
    UnknownInterface(String),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
