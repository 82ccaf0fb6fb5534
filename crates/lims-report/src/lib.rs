//! Worklist export library.
//!
//! Exporters turn a LIMS worklist layout into the sequence file an
//! instrument imports:
//!
//! - **Agilent ChemStation**: `;`-delimited sequence list
//! - **MALDI Biotyper**: `;`-delimited target plate list
//! - **Agilent MassHunter**: XML sequence table

mod chemstation;
mod common;
mod exporter;
mod maldi;
mod sequence_xml;

pub use chemstation::ChemStationExporter;
pub use common::{
    CSV_CONTENT_TYPE, ExportDocument, ExportOptions, SampleSlot, XML_CONTENT_TYPE,
    group_by_sample, normalize_title,
};
pub use exporter::{ExporterRegistry, WorklistExporter};
pub use maldi::MaldiBiotyperExporter;
pub use sequence_xml::MassHunterSequenceExporter;
