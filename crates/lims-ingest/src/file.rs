use std::fs;
use std::path::Path;

use lims_model::SourceFormat;

use crate::error::{IngestError, Result};

/// An uploaded instrument results file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl InstrumentFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }

    /// Base name without directories.
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename)
    }

    /// Base name without its final extension.
    pub fn stem(&self) -> &str {
        let basename = self.basename();
        match basename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => basename,
        }
    }

    pub fn extension_format(&self) -> Option<SourceFormat> {
        SourceFormat::from_filename(self.basename())
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
