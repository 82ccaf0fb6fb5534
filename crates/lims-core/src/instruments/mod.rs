//! Vendor instrument interfaces and their registry.
//!
//! # Architecture
//!
//! Every vendor adapter is described by an [`InstrumentInterface`]: its
//! identifier, accepted formats, declared field names and a factory for the
//! [`InstrumentParser`] that reads one file. Line-driven adapters implement
//! [`LineParser`] and are wrapped in [`LineDriven`]; table-shaped adapters
//! read keyed rows and implement [`InstrumentParser`] directly.
//!
//! # Example
//!
//! ```ignore
//! use lims_core::instruments::InstrumentRegistry;
//!
//! let registry = InstrumentRegistry::default();
//! if let Some(interface) = registry.get("maldibiotyper") {
//!     let mut parser = interface.create_parser(&options);
//!     parser.parse(&file, &catalog, &mut session);
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use lims_ingest::{InstrumentFile, transcode};
use lims_model::{ParserOptions, SampleCatalog, SourceFormat, WorksheetSelector};
use tracing::info_span;

use crate::driver::{LineParser, drive_lines};
use crate::keyed::{KeyedRow, read_keyed_rows};
use crate::session::ParseSession;

pub mod agilent_chemstation;
pub mod bruker_s8tiger;
pub mod generic_keyed;
pub mod maldibiotyper;
pub mod masshunter_aorc;
pub mod masshunter_pesticide;
pub mod masshunter_qualitative;
pub mod masshunter_quantitative;
pub mod pe_delta_lactoscope;
pub mod perkinelmer_nexion350x;
pub mod perkinelmer_winlab32;

/// Reads one instrument file into the session's accumulator.
pub trait InstrumentParser {
    /// Returns `false` when the file could not be processed to the end.
    fn parse(
        &mut self,
        file: &InstrumentFile,
        catalog: &dyn SampleCatalog,
        session: &mut ParseSession,
    ) -> bool;
}

/// Static description of a vendor adapter plus its parser factory.
pub trait InstrumentInterface: Send + Sync {
    /// Identifier used to select the adapter (e.g. `"agilent.chemstation"`).
    fn id(&self) -> &'static str;

    /// Human-readable instrument name.
    fn title(&self) -> &'static str;

    /// Formats the adapter accepts; anything else is rejected before parsing.
    fn accepted_formats(&self) -> &'static [SourceFormat];

    /// Format assumed when the upload does not name one.
    fn default_format(&self) -> SourceFormat {
        self.accepted_formats()
            .first()
            .copied()
            .unwrap_or(SourceFormat::Csv)
    }

    /// Interim and result field names the adapter writes into records.
    ///
    /// Patterned names use `{n}` for a running number (e.g. `Ion{n}Area`).
    fn field_names(&self) -> &'static [&'static str];

    fn create_parser(&self, options: &ParserOptions) -> Box<dyn InstrumentParser>;

    fn accepts(&self, format: SourceFormat) -> bool {
        self.accepted_formats().contains(&format)
    }
}

/// Where and how a parser reads its normalized lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSettings {
    pub delimiter: char,
    pub worksheet: WorksheetSelector,
    pub format: Option<SourceFormat>,
}

impl SourceSettings {
    /// Adapter defaults overridden by whatever `options` specifies.
    pub fn from_options(options: &ParserOptions, delimiter: char, worksheet: usize) -> Self {
        Self {
            delimiter: options.delimiter.unwrap_or(delimiter),
            worksheet: options
                .worksheet
                .clone()
                .unwrap_or(WorksheetSelector::Index(worksheet)),
            format: options.format,
        }
    }

    /// Normalized lines of `file`, or `None` after recording why not.
    pub fn load_lines(
        &self,
        file: &InstrumentFile,
        session: &mut ParseSession,
    ) -> Option<Vec<String>> {
        match transcode(file, self.format, &self.worksheet, self.delimiter) {
            Ok(lines) => Some(lines),
            Err(error) => {
                session.error(error.to_string());
                None
            }
        }
    }
}

/// Adapts a [`LineParser`] into an [`InstrumentParser`].
pub struct LineDriven<P> {
    parser: P,
    source: SourceSettings,
}

impl<P: LineParser> LineDriven<P> {
    pub fn new(parser: P, source: SourceSettings) -> Self {
        Self { parser, source }
    }

    pub fn into_inner(self) -> P {
        self.parser
    }
}

impl<P: LineParser> InstrumentParser for LineDriven<P> {
    fn parse(
        &mut self,
        file: &InstrumentFile,
        _catalog: &dyn SampleCatalog,
        session: &mut ParseSession,
    ) -> bool {
        let Some(lines) = self.source.load_lines(file, session) else {
            return false;
        };
        drive_lines(&mut self.parser, &lines, session)
    }
}

/// Read `file` as a header-keyed table and hand every row to `on_row`.
///
/// The session's line number follows the physical line of each row.
pub(crate) fn parse_keyed_rows<F>(
    file: &InstrumentFile,
    source: &SourceSettings,
    session: &mut ParseSession,
    mut on_row: F,
) -> bool
where
    F: FnMut(&KeyedRow, &mut ParseSession),
{
    let Some(lines) = source.load_lines(file, session) else {
        return false;
    };
    let span = info_span!("parse", filename = %session.filename(), line_count = lines.len());
    let _guard = span.enter();
    session.log(format!("Parsing file {}", session.filename()));
    let rows = match read_keyed_rows(&lines, source.delimiter) {
        Ok(rows) => rows,
        Err(error) => {
            session.error(format!("Can't read rows of {}: {error}", session.filename()));
            return false;
        }
    };
    for row in &rows {
        session.set_line_number(row.line_number);
        on_row(row, session);
    }
    session.log_end_of_file();
    true
}

/// Registry of instrument interfaces indexed by identifier.
///
/// The default registry is cached in a [`OnceLock`].
pub struct InstrumentRegistry {
    interfaces: BTreeMap<&'static str, Box<dyn InstrumentInterface>>,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self {
            interfaces: BTreeMap::new(),
        }
    }

    /// Registers an interface; an existing one with the same id is replaced.
    pub fn register(&mut self, interface: Box<dyn InstrumentInterface>) {
        self.interfaces.insert(interface.id(), interface);
    }

    pub fn get(&self, id: &str) -> Option<&dyn InstrumentInterface> {
        self.interfaces.get(id).map(|interface| interface.as_ref())
    }

    /// Interfaces ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &dyn InstrumentInterface> {
        self.interfaces.values().map(|interface| interface.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.interfaces.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Registry with every built-in vendor adapter.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(perkinelmer_winlab32::Winlab32));
        registry.register(Box::new(perkinelmer_nexion350x::Nexion350x));
        registry.register(Box::new(bruker_s8tiger::S8Tiger));
        registry.register(Box::new(pe_delta_lactoscope::DeltaLactoscope));
        registry.register(Box::new(maldibiotyper::MaldiBiotyper));
        registry.register(Box::new(masshunter_qualitative::MassHunterQualitative));
        registry.register(Box::new(masshunter_quantitative::MassHunterQuantitative));
        registry.register(Box::new(masshunter_pesticide::MassHunterPesticide));
        registry.register(Box::new(masshunter_aorc::MassHunterAorc));
        registry.register(Box::new(agilent_chemstation::ChemStation));
        registry.register(Box::new(generic_keyed::GenericKeyed));
        registry
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Shared registry with the built-in adapters.
pub fn default_registry() -> &'static InstrumentRegistry {
    static REGISTRY: OnceLock<InstrumentRegistry> = OnceLock::new();
    REGISTRY.get_or_init(InstrumentRegistry::with_builtin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_has_every_adapter() {
        let registry = InstrumentRegistry::default();
        assert_eq!(
            registry.ids(),
            vec![
                "agilent.chemstation",
                "agilent.masshunter.aorc",
                "agilent.masshunter.pesticide",
                "agilent.masshunter.qualitative",
                "agilent.masshunter.quantitative",
                "bruker.s8tiger",
                "generic.keyed",
                "maldibiotyper",
                "pedeltalactoscope",
                "perkinelmer.nexion350x",
                "perkinelmer.winlab32",
            ]
        );
    }

    #[test]
    fn every_adapter_declares_fields_and_formats() {
        for interface in default_registry().iter() {
            assert!(!interface.field_names().is_empty(), "{}", interface.id());
            assert!(interface.accepts(interface.default_format()), "{}", interface.id());
        }
    }

    #[test]
    fn options_override_source_defaults() {
        let options = ParserOptions::new().with_delimiter(';').with_worksheet("Data");
        let settings = SourceSettings::from_options(&options, '|', 2);
        assert_eq!(settings.delimiter, ';');
        assert_eq!(settings.worksheet, WorksheetSelector::Name("Data".to_string()));

        let defaults = SourceSettings::from_options(&ParserOptions::new(), '|', 2);
        assert_eq!(defaults.delimiter, '|');
        assert_eq!(defaults.worksheet, WorksheetSelector::Index(2));
    }
}
