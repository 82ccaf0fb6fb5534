//! Raw result accumulator.
//!
//! Vendor parsers emit [`FieldRecord`]s keyed by sample id and analyte
//! keyword. The accumulator keeps insertion order at both levels so the
//! serialized output follows the order rows appeared in the instrument file.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// Name of the field that holds the primary result pointer.
pub const DEFAULT_RESULT_FIELD: &str = "DefaultResult";
/// Name of the free-text remarks field.
pub const REMARKS_FIELD: &str = "Remarks";

/// A single interim or result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(value) => Some(value),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// One result record for a `(sample, keyword)` pair.
///
/// Serializes flat: `DefaultResult` and `Remarks` first, then the interim
/// fields in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldRecord {
    #[serde(rename = "DefaultResult")]
    pub default_result: Option<String>,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, FieldValue>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whose primary result lives in `field`.
    pub fn with_default_result(field: impl Into<String>) -> Self {
        Self {
            default_result: Some(field.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// The value the `DefaultResult` pointer refers to, if any.
    pub fn default_value(&self) -> Option<&FieldValue> {
        self.default_result
            .as_deref()
            .and_then(|field| self.fields.get(field))
    }

    /// Number of numeric values stored in this record.
    pub fn numeric_count(&self) -> usize {
        self.fields.values().filter(|value| value.is_number()).count()
    }

    /// Merge `other` into `self`: fields present in `other` override, the
    /// rest are kept. A `DefaultResult` or non-empty `Remarks` in `other`
    /// replaces the existing one.
    pub fn merge(&mut self, other: FieldRecord) {
        if other.default_result.is_some() {
            self.default_result = other.default_result;
        }
        if !other.remarks.is_empty() {
            self.remarks = other.remarks;
        }
        for (name, value) in other.fields {
            self.fields.insert(name, value);
        }
    }
}

/// Ordered mapping sample id -> analyte keyword -> records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawResults {
    samples: IndexMap<String, IndexMap<String, Vec<FieldRecord>>>,
}

impl RawResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `record` into the latest record stored for `(sample, keyword)`.
    pub fn add_result(
        &mut self,
        sample: impl Into<String>,
        keyword: impl Into<String>,
        record: FieldRecord,
    ) {
        let records = self
            .samples
            .entry(sample.into())
            .or_default()
            .entry(keyword.into())
            .or_default();
        match records.last_mut() {
            Some(latest) => latest.merge(record),
            None => records.push(record),
        }
    }

    /// Store `record` as an additional record for `(sample, keyword)`.
    pub fn append_result(
        &mut self,
        sample: impl Into<String>,
        keyword: impl Into<String>,
        record: FieldRecord,
    ) {
        self.samples
            .entry(sample.into())
            .or_default()
            .entry(keyword.into())
            .or_default()
            .push(record);
    }

    /// Latest record for `(sample, keyword)`.
    pub fn get(&self, sample: &str, keyword: &str) -> Option<&FieldRecord> {
        self.records(sample, keyword).last()
    }

    pub fn records(&self, sample: &str, keyword: &str) -> &[FieldRecord] {
        self.samples
            .get(sample)
            .and_then(|keywords| keywords.get(keyword))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn sample(&self, sample: &str) -> Option<&IndexMap<String, Vec<FieldRecord>>> {
        self.samples.get(sample)
    }

    pub fn contains_sample(&self, sample: &str) -> bool {
        self.samples.contains_key(sample)
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &FieldRecord)> {
        self.samples.iter().flat_map(|(sample, keywords)| {
            keywords.iter().flat_map(move |(keyword, records)| {
                records
                    .iter()
                    .map(move |record| (sample.as_str(), keyword.as_str(), record))
            })
        })
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct samples.
    pub fn object_count(&self) -> usize {
        self.samples.len()
    }

    /// Total records across all samples and keywords.
    pub fn analysis_count(&self) -> usize {
        self.samples
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Numeric values stored across all records.
    pub fn result_count(&self) -> usize {
        self.iter().map(|(_, _, record)| record.numeric_count()).sum()
    }
}

impl Serialize for RawResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.samples.len()))?;
        for (sample, keywords) in &self.samples {
            map.serialize_entry(sample, &KeywordEntries(keywords))?;
        }
        map.end()
    }
}

struct KeywordEntries<'a>(&'a IndexMap<String, Vec<FieldRecord>>);

impl Serialize for KeywordEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (keyword, records) in self.0 {
            map.serialize_entry(keyword, &RecordEntries(records))?;
        }
        map.end()
    }
}

struct RecordEntries<'a>(&'a [FieldRecord]);

impl Serialize for RecordEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let [single] = self.0 {
            return single.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for record in self.0 {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_result_merges_into_latest_record() {
        let mut results = RawResults::new();
        results.add_result(
            "S1",
            "Fe",
            FieldRecord::with_default_result("reading").with_field("reading", 1.0),
        );
        results.add_result("S1", "Fe", FieldRecord::new().with_field("lld", "0.01"));

        let record = results.get("S1", "Fe").expect("record");
        assert_eq!(record.default_result.as_deref(), Some("reading"));
        assert_eq!(record.number("reading"), Some(1.0));
        assert_eq!(record.text("lld"), Some("0.01"));
        assert_eq!(results.analysis_count(), 1);
    }

    #[test]
    fn append_result_keeps_every_record() {
        let mut results = RawResults::new();
        results.append_result("S1", "RT", FieldRecord::new().with_field("RT", 1.5));
        results.append_result("S1", "RT", FieldRecord::new().with_field("RT", 2.5));
        assert_eq!(results.records("S1", "RT").len(), 2);
        assert_eq!(results.get("S1", "RT").and_then(|r| r.number("RT")), Some(2.5));
    }

    #[test]
    fn counts_follow_samples_records_and_numbers() {
        let mut results = RawResults::new();
        results.add_result(
            "S1",
            "Fe",
            FieldRecord::new().with_field("a", 1.0).with_field("b", "x"),
        );
        results.add_result("S2", "Cu", FieldRecord::new().with_field("a", 2.0));
        results.append_result("S2", "Cu", FieldRecord::new().with_field("a", 3.0));
        assert_eq!(results.object_count(), 2);
        assert_eq!(results.analysis_count(), 3);
        assert_eq!(results.result_count(), 3);
    }

    #[test]
    fn default_value_follows_pointer() {
        let record = FieldRecord::with_default_result("fe").with_field("fe", 12.5);
        assert_eq!(record.default_value(), Some(&FieldValue::Number(12.5)));
        assert_eq!(FieldRecord::new().default_value(), None);
    }
}
