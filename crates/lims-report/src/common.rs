//! Shared types and helpers for worklist exporters.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use csv::{Terminator, WriterBuilder};
use lims_model::{Worklist, WorklistEntry};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// Content type of delimited exports.
pub const CSV_CONTENT_TYPE: &str = "text/comma-separated-values";

/// Content type of XML exports.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Options shared by every exporter.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Timestamp embedded in generated list names and headers.
    pub generated_at: NaiveDateTime,
}

impl ExportOptions {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(Local::now().naive_local())
    }
}

/// A generated file ready to be handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl ExportDocument {
    /// Write the document into `dir` under its generated filename.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Lowercase `value` and collapse every run of other characters into `-`.
pub fn normalize_title(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// All worklist entries of one sample, placed on the slot it was first seen at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSlot<'a> {
    pub slot: u32,
    pub sample_id: &'a str,
    pub entries: Vec<&'a WorklistEntry>,
}

impl<'a> SampleSlot<'a> {
    /// Container of the first entry that names one.
    pub fn container_id(&self) -> Option<&'a str> {
        self.entries
            .iter()
            .find_map(|entry| entry.container_id.as_deref())
    }

    pub fn first_analysis_title(&self) -> &'a str {
        self.entries
            .first()
            .map_or("", |entry| entry.analysis_title.as_str())
    }
}

/// Group entries by sample, ordered by slot; equal slots keep input order.
pub fn group_by_sample(worklist: &Worklist) -> Vec<SampleSlot<'_>> {
    let mut slots: Vec<SampleSlot<'_>> = Vec::new();
    for entry in &worklist.entries {
        match slots
            .iter_mut()
            .find(|slot| slot.sample_id == entry.sample_id)
        {
            Some(slot) => slot.entries.push(entry),
            None => slots.push(SampleSlot {
                slot: entry.position,
                sample_id: &entry.sample_id,
                entries: vec![entry],
            }),
        }
    }
    slots.sort_by_key(|slot| slot.slot);
    slots
}

/// Rows joined with `;` and CRLF terminators, as instrument software expects.
pub fn write_semicolon_rows(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).context("write csv row")?;
    }
    writer.into_inner().context("flush csv rows")
}

/// Write a simple text element.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sample_id: &str, analysis: &str, position: u32) -> WorklistEntry {
        WorklistEntry {
            analysis_id: format!("{sample_id}-{analysis}"),
            analysis_title: analysis.to_string(),
            sample_id: sample_id.to_string(),
            container_id: None,
            position,
        }
    }

    #[test]
    fn normalize_title_collapses_punctuation() {
        assert_eq!(normalize_title("Agilent ChemStation"), "agilent-chemstation");
        assert_eq!(normalize_title("  F SO2 & T SO2!! "), "f-so2-t-so2");
        assert_eq!(normalize_title("maldi.biotyper"), "maldi-biotyper");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn slots_follow_first_position_with_stable_ties() {
        let mut worklist = Worklist::new("WS-1");
        worklist.entries = vec![
            entry("S3", "Fe", 3),
            entry("S1", "Fe", 1),
            entry("S3", "Cu", 1),
            entry("S2", "Fe", 1),
        ];
        let slots = group_by_sample(&worklist);
        let order: Vec<(u32, &str)> = slots.iter().map(|slot| (slot.slot, slot.sample_id)).collect();
        assert_eq!(order, vec![(1, "S1"), (1, "S2"), (3, "S3")]);
        assert_eq!(slots[2].entries.len(), 2);
        assert_eq!(slots[2].first_analysis_title(), "Fe");
    }
}
