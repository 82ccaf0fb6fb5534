//! Agilent ChemStation sequence lists.

use anyhow::Result;
use lims_model::Worklist;
use tracing::debug;

use crate::common::{
    CSV_CONTENT_TYPE, ExportDocument, ExportOptions, group_by_sample, normalize_title,
    write_semicolon_rows,
};
use crate::exporter::WorklistExporter;

const TRAY: &str = "1";
const DEFAULT_DILUTE_FACTOR: &str = "1";
const DEFAULT_METHOD: &str = "F SO2 & T SO2";

pub struct ChemStationExporter;

impl WorklistExporter for ChemStationExporter {
    fn id(&self) -> &'static str {
        "agilent.chemstation"
    }

    fn title(&self) -> &'static str {
        "Agilent ChemStation Exporter"
    }

    /// One row per sample after a `[list name, method]` header row.
    fn export(&self, worklist: &Worklist, options: &ExportOptions) -> Result<ExportDocument> {
        let dilute_factor = worklist
            .option("dilute_factor")
            .unwrap_or(DEFAULT_DILUTE_FACTOR);
        let method = worklist.option("method").unwrap_or(DEFAULT_METHOD);
        let list_name = format!(
            "{}_{}_{}",
            worklist.id,
            normalize_title(&worklist.instrument_title),
            options.generated_at.format("%Y%m%d-%H%M")
        );

        let mut rows = vec![vec![list_name, method.to_string()]];
        for slot in group_by_sample(worklist) {
            rows.push(vec![
                TRAY.to_string(),
                slot.slot.to_string(),
                slot.sample_id.to_string(),
                slot.container_id().unwrap_or_default().to_string(),
                dilute_factor.to_string(),
                String::new(),
            ]);
        }
        debug!(worklist = %worklist.id, samples = rows.len() - 1, "chemstation sequence");

        Ok(ExportDocument {
            bytes: write_semicolon_rows(&rows)?,
            content_type: CSV_CONTENT_TYPE,
            filename: format!(
                "{}-{}.csv",
                worklist.id,
                normalize_title(&worklist.data_interface)
            ),
        })
    }
}
