//! Exporter trait and registry.

use std::collections::BTreeMap;

use anyhow::Result;
use lims_model::Worklist;

use crate::chemstation::ChemStationExporter;
use crate::common::{ExportDocument, ExportOptions};
use crate::maldi::MaldiBiotyperExporter;
use crate::sequence_xml::MassHunterSequenceExporter;

/// Turns a worklist layout into a vendor sequence file.
pub trait WorklistExporter: Send + Sync {
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn export(&self, worklist: &Worklist, options: &ExportOptions) -> Result<ExportDocument>;
}

/// Exporters indexed by identifier.
pub struct ExporterRegistry {
    exporters: BTreeMap<&'static str, Box<dyn WorklistExporter>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self {
            exporters: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, exporter: Box<dyn WorklistExporter>) {
        self.exporters.insert(exporter.id(), exporter);
    }

    pub fn get(&self, id: &str) -> Option<&dyn WorklistExporter> {
        self.exporters.get(id).map(|exporter| exporter.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn WorklistExporter> {
        self.exporters.values().map(|exporter| exporter.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.exporters.keys().copied().collect()
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ChemStationExporter));
        registry.register(Box::new(MaldiBiotyperExporter));
        registry.register(Box::new(MassHunterSequenceExporter));
        registry
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_exporters() {
        assert_eq!(
            ExporterRegistry::default().ids(),
            vec!["agilent.chemstation", "agilent.masshunter.sequence", "maldibiotyper"]
        );
    }
}
