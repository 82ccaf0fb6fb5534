//! Sample catalogs: which analyses the LIMS knows for a sample.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resolution::{AnalyteResolution, MatchMode, resolve_analyte};

/// Read-only lookup of the analysis keywords configured for a sample.
///
/// Lookups are idempotent; a miss is a data error for the caller, never a
/// reason to retry.
pub trait SampleCatalog: Send + Sync {
    /// Keywords configured for `sample_id`, or `None` when the sample is unknown.
    fn analyses(&self, sample_id: &str) -> Option<Vec<String>>;

    /// An open catalog accepts every sample and every derived keyword.
    fn is_open(&self) -> bool {
        false
    }

    fn contains_sample(&self, sample_id: &str) -> bool {
        self.is_open() || self.analyses(sample_id).is_some()
    }

    /// Resolve `derived` against the analyses of `sample_id`.
    ///
    /// Returns `None` when the sample is unknown.
    fn resolve(&self, sample_id: &str, derived: &str, mode: MatchMode) -> Option<AnalyteResolution> {
        if self.is_open() {
            return Some(AnalyteResolution::Found(derived.to_string()));
        }
        self.analyses(sample_id)
            .map(|keywords| resolve_analyte(derived, keywords, mode))
    }
}

/// In-memory catalog, typically loaded from JSON:
/// `{"samples": {"S1": ["Fe", "Cu"]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCatalog {
    #[serde(default)]
    samples: IndexMap<String, Vec<String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sample<I, S>(mut self, sample_id: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(sample_id, keywords);
        self
    }

    pub fn insert<I, S>(&mut self, sample_id: impl Into<String>, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.samples
            .insert(sample_id.into(), keywords.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleCatalog for MemoryCatalog {
    fn analyses(&self, sample_id: &str) -> Option<Vec<String>> {
        self.samples.get(sample_id).cloned()
    }
}

/// Catalog used when no LIMS lookup is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCatalog;

impl SampleCatalog for OpenCatalog {
    fn analyses(&self, _sample_id: &str) -> Option<Vec<String>> {
        Some(Vec::new())
    }

    fn is_open(&self) -> bool {
        true
    }
}
