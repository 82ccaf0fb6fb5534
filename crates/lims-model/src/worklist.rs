//! Worklist layouts exported to instrument sequence files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One analysis placed on a worklist slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklistEntry {
    pub analysis_id: String,
    pub analysis_title: String,
    pub sample_id: String,
    #[serde(default)]
    pub container_id: Option<String>,
    pub position: u32,
}

/// An ordered batch of analyses assigned to an instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worklist {
    pub id: String,
    #[serde(default)]
    pub instrument_title: String,
    #[serde(default)]
    pub data_interface: String,
    /// Exporter options configured on the instrument (e.g. `dilute_factor`).
    #[serde(default)]
    pub options: IndexMap<String, String>,
    #[serde(default)]
    pub entries: Vec<WorklistEntry>,
}

impl Worklist {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}
