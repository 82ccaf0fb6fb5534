//! Bruker MALDI Biotyper target plate lists.

use anyhow::Result;
use lims_model::Worklist;

use crate::common::{
    CSV_CONTENT_TYPE, ExportDocument, ExportOptions, group_by_sample, normalize_title,
    write_semicolon_rows,
};
use crate::exporter::WorklistExporter;

pub struct MaldiBiotyperExporter;

impl WorklistExporter for MaldiBiotyperExporter {
    fn id(&self) -> &'static str {
        "maldibiotyper"
    }

    fn title(&self) -> &'static str {
        "MALDI Biotyper"
    }

    fn export(&self, worklist: &Worklist, _options: &ExportOptions) -> Result<ExportDocument> {
        let rows: Vec<Vec<String>> = group_by_sample(worklist)
            .iter()
            .map(|slot| {
                vec![
                    format!("A{}", slot.slot),
                    slot.sample_id.to_string(),
                    slot.first_analysis_title().to_string(),
                ]
            })
            .collect();
        Ok(ExportDocument {
            bytes: write_semicolon_rows(&rows)?,
            content_type: CSV_CONTENT_TYPE,
            filename: format!("{}-{}.in.csv", worklist.id, normalize_title(self.title())),
        })
    }
}
