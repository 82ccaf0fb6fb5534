//! Keyword sanitation helpers shared by the vendor parsers.

/// LIMS keyword form: ASCII letters and digits only.
pub fn format_keyword(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// ASCII letters, digits and `_`.
pub fn strip_non_word(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}

/// ASCII letters, digits, `_` and `-`; used for sample identifiers.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'))
        .collect()
}
