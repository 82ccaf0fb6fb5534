use thiserror::Error;

#[derive(Debug, Error)]
pub enum LimsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown source format: {0}")]
    UnknownFormat(String),
    #[error("unknown result unit: {0} (expected pct or ppm)")]
    UnknownUnit(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, LimsError>;
