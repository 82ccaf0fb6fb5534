//! Delimited text passthrough.

/// Decode `bytes` as UTF-8 (lossy, BOM stripped) and split into lines.
///
/// Lines are split on `\n` and `\r\n`; blank lines are kept so physical
/// line numbers stay stable. A trailing newline does not produce an extra
/// empty line.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let decoded = String::from_utf8_lossy(bytes);
    let text: &str = decoded.as_ref();
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines().map(str::to_string).collect()
}
