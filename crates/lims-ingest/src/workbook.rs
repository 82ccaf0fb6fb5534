//! Workbook normalization: one delimiter-joined line per worksheet row.
//!
//! Cells are rendered as text (numbers in shortest decimal form, booleans as
//! `True`/`False`, dates as `YYYY-MM-DD HH:MM:SS`), trimmed, and cut at the
//! first embedded newline. Fully blank rows are dropped. Columns left of the
//! first used column are emitted as empty tokens so positions match the sheet.

use std::fmt::Display;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use chrono::{NaiveDate, TimeDelta};
use lims_model::{SourceFormat, WorksheetSelector};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::text::decode_lines;

/// Normalize `bytes` read as `format` into text lines.
///
/// CSV input is passed through (see [`decode_lines`]); the selector and
/// delimiter only apply to workbooks.
pub fn normalize_workbook(
    bytes: &[u8],
    format: SourceFormat,
    selector: &WorksheetSelector,
    delimiter: char,
) -> Result<Vec<String>> {
    match format {
        SourceFormat::Xlsx => {
            let workbook: Xlsx<_> = open_workbook(bytes, format)?;
            sheet_lines(workbook, format, selector, delimiter)
        }
        SourceFormat::Xls => {
            let workbook: Xls<_> = open_workbook(bytes, format)?;
            sheet_lines(workbook, format, selector, delimiter)
        }
        SourceFormat::Csv => Ok(decode_lines(bytes)),
    }
}

fn open_workbook<'a, W>(bytes: &'a [u8], format: SourceFormat) -> Result<W>
where
    W: Reader<Cursor<&'a [u8]>>,
    W::Error: Display,
{
    W::new(Cursor::new(bytes)).map_err(|error| IngestError::FormatMismatch {
        format,
        message: error.to_string(),
    })
}

fn sheet_lines<'a, W>(
    mut workbook: W,
    format: SourceFormat,
    selector: &WorksheetSelector,
    delimiter: char,
) -> Result<Vec<String>>
where
    W: Reader<Cursor<&'a [u8]>>,
    W::Error: Display,
{
    let sheet_names = workbook.sheet_names();
    let Some(index) = selector.resolve(&sheet_names) else {
        return Err(IngestError::SheetNotFound {
            selector: selector.clone(),
            available: sheet_names,
        });
    };
    let name = &sheet_names[index];
    let range = workbook
        .worksheet_range(name)
        .map_err(|error| IngestError::FormatMismatch {
            format,
            message: error.to_string(),
        })?;
    let lines = range_lines(&range, delimiter);
    debug!(
        sheet = %name,
        format = %format,
        line_count = lines.len(),
        "normalized worksheet"
    );
    Ok(lines)
}

fn range_lines(range: &Range<Data>, delimiter: char) -> Vec<String> {
    let leading_columns = range.start().map_or(0, |(_, column)| column as usize);
    let separator = delimiter.to_string();
    let mut lines = Vec::new();
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        let mut tokens = vec![String::new(); leading_columns];
        tokens.extend(cells);
        lines.push(tokens.join(&separator));
    }
    lines
}

/// Text form of a single cell.
pub fn render_cell(cell: &Data) -> String {
    let text = match cell {
        Data::Empty => return String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(value) => excel_serial_to_text(value.as_f64()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Error(error) => error.to_string(),
    };
    first_line(&text).trim().to_string()
}

fn first_line(text: &str) -> &str {
    text.split(['\n', '\r']).next().unwrap_or_default()
}

/// Excel serial day number (1900 date system) as `YYYY-MM-DD HH:MM:SS`.
fn excel_serial_to_text(serial: f64) -> String {
    let millis = (serial * 86_400_000.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_milliseconds(millis))
        .and_then(|(epoch, offset)| epoch.checked_add_signed(offset))
        .map_or_else(
            || serial.to_string(),
            |stamp| stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}
