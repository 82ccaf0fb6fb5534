use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use serde_json::json;
use tracing::{info, info_span};

use lims_core::{ImportOutcome, default_registry, import_file};
use lims_ingest::{InstrumentFile, load_catalog};
use lims_model::{OpenCatalog, SampleCatalog, Worklist};
use lims_report::{ExportOptions, ExporterRegistry, group_by_sample};

use crate::summary::{apply_table_style, header_cell};
use crate::types::{ExportReport, ExportRequest, ImportReport, ImportRequest};

pub fn run_import(request: &ImportRequest) -> Result<ImportReport> {
    let span = info_span!(
        "command",
        name = "import",
        interface = %request.interface,
        file = %request.file.display()
    );
    let _guard = span.enter();

    let file = InstrumentFile::from_path(&request.file)
        .with_context(|| format!("read {}", request.file.display()))?;
    let catalog: Box<dyn SampleCatalog> = match &request.catalog {
        Some(path) => Box::new(
            load_catalog(path).with_context(|| format!("load catalog {}", path.display()))?,
        ),
        None => Box::new(OpenCatalog),
    };

    let start = Instant::now();
    let outcome = import_file(&request.interface, &file, &request.options, catalog.as_ref())
        .with_context(|| format!("import {}", request.file.display()))?;
    info!(
        success = outcome.success,
        samples = outcome.raw_results.object_count(),
        duration_ms = start.elapsed().as_millis(),
        "import complete"
    );

    if let Some(path) = &request.output {
        write_outcome(path, &outcome)?;
        info!(path = %path.display(), "wrote results");
    }

    Ok(ImportReport {
        interface: request.interface.clone(),
        file: request.file.clone(),
        outcome,
        output: request.output.clone(),
    })
}

/// `{"success": .., "results": {..}, "summary": {"errors", "log", "warns"}}`.
fn write_outcome(path: &Path, outcome: &ImportOutcome) -> Result<()> {
    let value = json!({
        "success": outcome.success,
        "results": outcome.results_json().context("serialize results")?,
        "summary": outcome.to_json(),
    });
    let text = serde_json::to_string_pretty(&value).context("serialize outcome")?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

pub fn run_export(request: &ExportRequest) -> Result<ExportReport> {
    let span = info_span!(
        "command",
        name = "export",
        exporter = %request.exporter,
        worklist = %request.worklist.display()
    );
    let _guard = span.enter();

    let text = fs::read_to_string(&request.worklist)
        .with_context(|| format!("read {}", request.worklist.display()))?;
    let worklist: Worklist = serde_json::from_str(&text)
        .with_context(|| format!("parse worklist {}", request.worklist.display()))?;

    let registry = ExporterRegistry::default();
    let exporter = registry.get(&request.exporter).ok_or_else(|| {
        anyhow!(
            "unknown exporter: {} (available: {})",
            request.exporter,
            registry.ids().join(", ")
        )
    })?;
    let document = exporter
        .export(&worklist, &ExportOptions::default())
        .with_context(|| format!("export worklist {}", worklist.id))?;
    let path = document.write_to_dir(&request.output_dir)?;
    let samples = group_by_sample(&worklist).len();
    info!(worklist = %worklist.id, samples, path = %path.display(), "export complete");

    Ok(ExportReport {
        exporter: request.exporter.clone(),
        worklist_id: worklist.id,
        samples,
        path,
    })
}

pub fn run_instruments() -> Result<()> {
    let mut interfaces = Table::new();
    interfaces.set_header(vec![
        header_cell("Interface"),
        header_cell("Title"),
        header_cell("Formats"),
    ]);
    apply_table_style(&mut interfaces);
    for interface in default_registry().iter() {
        let formats: Vec<String> = interface
            .accepted_formats()
            .iter()
            .map(ToString::to_string)
            .collect();
        interfaces.add_row(vec![
            interface.id().to_string(),
            interface.title().to_string(),
            formats.join(", "),
        ]);
    }
    println!("{interfaces}");

    let mut exporters = Table::new();
    exporters.set_header(vec![header_cell("Exporter"), header_cell("Title")]);
    apply_table_style(&mut exporters);
    for exporter in ExporterRegistry::default().iter() {
        exporters.add_row(vec![exporter.id(), exporter.title()]);
    }
    println!("{exporters}");
    Ok(())
}
