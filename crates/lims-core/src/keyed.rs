//! Header-keyed row reading for table-shaped instrument exports.

use csv::ReaderBuilder;
use indexmap::IndexMap;

/// One data row keyed by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRow {
    /// Physical line number of the row in the normalized text.
    pub line_number: usize,
    pub values: IndexMap<String, String>,
}

impl KeyedRow {
    /// Trimmed cell under `header`; empty when the column is absent.
    pub fn value(&self, header: &str) -> &str {
        self.values.get(header).map_or("", String::as_str)
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.values.contains_key(header)
    }

    /// Row rendered for diagnostics.
    pub fn describe(&self) -> String {
        self.values
            .iter()
            .map(|(header, value)| format!("{header}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Read `lines` as a delimited table whose first record is the header.
///
/// Rows shorter than the header leave the missing columns out; extra cells
/// without a header are dropped.
pub fn read_keyed_rows(lines: &[String], delimiter: char) -> Result<Vec<KeyedRow>, csv::Error> {
    let text = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter_byte(delimiter))
        .from_reader(text.as_bytes());
    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(normalize_cell).collect(),
        None => return Ok(Vec::new()),
    };
    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let line_number = record
            .position()
            .map_or(0, |position| position.line() as usize);
        let values = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), normalize_cell(value)))
            .collect();
        rows.push(KeyedRow {
            line_number,
            values,
        });
    }
    Ok(rows)
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn delimiter_byte(delimiter: char) -> u8 {
    u8::try_from(delimiter).unwrap_or(b',')
}
