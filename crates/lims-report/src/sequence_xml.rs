//! Agilent MassHunter sequence tables (XML).
//!
//! One `Sample` element per slot carries the sample id, its container,
//! dilution, acquisition method and the analyses requested on it.

use anyhow::{Context, Result};
use lims_model::Worklist;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::common::{
    ExportDocument, ExportOptions, SampleSlot, XML_CONTENT_TYPE, group_by_sample,
    normalize_title, write_text_element,
};
use crate::exporter::WorklistExporter;

const DEFAULT_DILUTION: &str = "1";

pub struct MassHunterSequenceExporter;

impl WorklistExporter for MassHunterSequenceExporter {
    fn id(&self) -> &'static str {
        "agilent.masshunter.sequence"
    }

    fn title(&self) -> &'static str {
        "Agilent MassHunter Sequence"
    }

    fn export(&self, worklist: &Worklist, options: &ExportOptions) -> Result<ExportDocument> {
        let title = if worklist.instrument_title.trim().is_empty() {
            self.title()
        } else {
            worklist.instrument_title.as_str()
        };
        let bytes = write_sequence_table(worklist, options).context("write sequence table")?;
        Ok(ExportDocument {
            bytes,
            content_type: XML_CONTENT_TYPE,
            filename: format!("{}-{}.xml", worklist.id, normalize_title(title)),
        })
    }
}

fn write_sequence_table(worklist: &Worklist, options: &ExportOptions) -> Result<Vec<u8>> {
    let dilution = worklist.option("dilute_factor").unwrap_or(DEFAULT_DILUTION);
    let method = worklist.option("method");
    let created = options
        .generated_at
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();

    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("SequenceTable");
    root.push_attribute(("WorklistId", worklist.id.as_str()));
    root.push_attribute(("Instrument", worklist.instrument_title.as_str()));
    root.push_attribute(("Created", created.as_str()));
    xml.write_event(Event::Start(root))?;

    for slot in group_by_sample(worklist) {
        write_sample(&mut xml, &slot, dilution, method)?;
    }

    xml.write_event(Event::End(BytesEnd::new("SequenceTable")))?;
    Ok(xml.into_inner())
}

fn write_sample(
    xml: &mut Writer<Vec<u8>>,
    slot: &SampleSlot<'_>,
    dilution: &str,
    method: Option<&str>,
) -> Result<()> {
    let mut sample = BytesStart::new("Sample");
    sample.push_attribute(("Slot", slot.slot.to_string().as_str()));
    xml.write_event(Event::Start(sample))?;

    write_text_element(xml, "SampleId", slot.sample_id)?;
    if let Some(container) = slot.container_id() {
        write_text_element(xml, "Container", container)?;
    }
    write_text_element(xml, "Dilution", dilution)?;
    if let Some(method) = method {
        write_text_element(xml, "Method", method)?;
    }

    xml.write_event(Event::Start(BytesStart::new("Analyses")))?;
    for entry in &slot.entries {
        let mut analysis = BytesStart::new("Analysis");
        analysis.push_attribute(("Id", entry.analysis_id.as_str()));
        xml.write_event(Event::Start(analysis))?;
        xml.write_event(Event::Text(BytesText::new(&entry.analysis_title)))?;
        xml.write_event(Event::End(BytesEnd::new("Analysis")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Analyses")))?;

    xml.write_event(Event::End(BytesEnd::new("Sample")))?;
    Ok(())
}
