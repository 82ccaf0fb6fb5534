//! Import controller: policy checks, parser dispatch and the final outcome.

use chrono::NaiveDateTime;
use lims_ingest::InstrumentFile;
use lims_model::{ImportSummary, ParserOptions, RawResults, SampleCatalog, SourceFormat};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::error::{ImportError, Result};
use crate::instruments::{InstrumentInterface, InstrumentRegistry, default_registry};
use crate::session::ParseSession;

/// Everything a finished import hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub raw_results: RawResults,
    pub summary: ImportSummary,
    /// `false` when the file was rejected or could not be parsed to the end.
    pub success: bool,
}

impl ImportOutcome {
    /// Outcome of an import rejected before parsing.
    pub fn rejected(error: &ImportError) -> Self {
        let mut summary = ImportSummary::new();
        summary.error(error.to_string());
        Self {
            raw_results: RawResults::new(),
            summary,
            success: false,
        }
    }

    /// `{"errors": [...], "log": [...], "warns": [...]}`.
    pub fn to_json(&self) -> serde_json::Value {
        self.summary.to_json()
    }

    pub fn results_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.raw_results)
    }
}

/// Format the import will be parsed as, or the policy error that rejects it.
pub fn check_policy(
    interface: &dyn InstrumentInterface,
    file: &InstrumentFile,
    options: &ParserOptions,
) -> Result<SourceFormat> {
    if file.filename.trim().is_empty() {
        return Err(ImportError::NoFileSelected);
    }
    let format = match options.format.or_else(|| file.extension_format()) {
        Some(format) => format,
        None => {
            let extension = file
                .basename()
                .rsplit_once('.')
                .map_or("", |(_, extension)| extension);
            return Err(ImportError::UnrecognizedFormat(extension.to_string()));
        }
    };
    if !interface.accepts(format) {
        return Err(ImportError::UnrecognizedFormat(format.to_string()));
    }
    Ok(format)
}

/// Runs imports against a registry of instrument interfaces.
pub struct Importer<'a> {
    registry: &'a InstrumentRegistry,
    parsed_at: Option<NaiveDateTime>,
}

impl<'a> Importer<'a> {
    pub fn new(registry: &'a InstrumentRegistry) -> Self {
        Self {
            registry,
            parsed_at: None,
        }
    }

    /// Fix the parse timestamp instead of using the local clock.
    #[must_use]
    pub fn with_parsed_at(mut self, parsed_at: NaiveDateTime) -> Self {
        self.parsed_at = Some(parsed_at);
        self
    }

    /// Import `file` with the interface registered as `interface_id`.
    ///
    /// An unknown interface is an error; every other failure is reported
    /// in the outcome's summary.
    pub fn import(
        &self,
        interface_id: &str,
        file: &InstrumentFile,
        options: &ParserOptions,
        catalog: &dyn SampleCatalog,
    ) -> Result<ImportOutcome> {
        let interface = self
            .registry
            .get(interface_id)
            .ok_or_else(|| ImportError::UnknownInterface(interface_id.to_string()))?;
        Ok(self.import_with(interface, file, options, catalog))
    }

    pub fn import_with(
        &self,
        interface: &dyn InstrumentInterface,
        file: &InstrumentFile,
        options: &ParserOptions,
        catalog: &dyn SampleCatalog,
    ) -> ImportOutcome {
        let span = info_span!("import", interface = interface.id(), filename = %file.filename);
        let _guard = span.enter();

        let format = match check_policy(interface, file, options) {
            Ok(format) => format,
            Err(error) => {
                warn!(%error, "import rejected");
                return ImportOutcome::rejected(&error);
            }
        };

        let mut session = ParseSession::new(file.basename());
        if let Some(parsed_at) = self.parsed_at {
            session = session.with_parsed_at(parsed_at);
        }
        let options = ParserOptions {
            format: Some(format),
            ..options.clone()
        };
        let mut parser = interface.create_parser(&options);
        let success = parser.parse(file, catalog, &mut session);
        let (raw_results, summary) = session.into_parts();
        info!(
            success,
            samples = raw_results.object_count(),
            results = raw_results.result_count(),
            errors = summary.errors.len(),
            warnings = summary.warns.len(),
            "import finished"
        );
        ImportOutcome {
            raw_results,
            summary,
            success,
        }
    }
}

/// Import `file` with a built-in interface.
pub fn import_file(
    interface_id: &str,
    file: &InstrumentFile,
    options: &ParserOptions,
    catalog: &dyn SampleCatalog,
) -> Result<ImportOutcome> {
    Importer::new(default_registry()).import(interface_id, file, options, catalog)
}
