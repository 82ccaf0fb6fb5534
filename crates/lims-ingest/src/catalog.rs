use std::fs;
use std::path::Path;

use lims_model::MemoryCatalog;
use tracing::info;

use crate::error::{IngestError, Result};

/// Load a sample catalog from a JSON file shaped like
/// `{"samples": {"S1": ["Fe", "Cu"]}}`.
pub fn load_catalog(path: &Path) -> Result<MemoryCatalog> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: MemoryCatalog =
        serde_json::from_str(&text).map_err(|source| IngestError::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), sample_count = catalog.len(), "loaded sample catalog");
    Ok(catalog)
}
