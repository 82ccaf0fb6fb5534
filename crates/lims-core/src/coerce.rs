//! Numeric coercion of instrument result cells.
//!
//! Blank cells, `ND` (not detected) and dash placeholders read as zero.
//! Parseable numbers that are not positive are clamped to zero as well.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No valid number {value}")]
pub struct InvalidResultValue {
    pub value: String,
}

/// Coerce a raw result cell into a non-negative number.
pub fn coerce_result(raw: &str) -> Result<f64, InvalidResultValue> {
    let value = raw.trim();
    if value.is_empty() || value == "ND" || value.starts_with("--") {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(number) if !number.is_finite() => Err(InvalidResultValue {
            value: raw.to_string(),
        }),
        Ok(number) if number > 0.0 => Ok(number),
        Ok(_) => Ok(0.0),
        Err(_) => Err(InvalidResultValue {
            value: raw.to_string(),
        }),
    }
}

/// Parse a number as-is: no placeholders, no clamping.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Digits and dots extracted from free text such as `"67.9 %"`.
///
/// A `-` directly before the first digit keeps the value negative.
pub fn extract_number(raw: &str) -> Option<f64> {
    let start = raw.find(|ch: char| ch.is_ascii_digit() || ch == '.')?;
    let digits: String = raw[start..]
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();
    let value = digits.parse::<f64>().ok()?;
    let negative = raw[..start].trim_end().ends_with('-');
    Some(if negative { -value } else { value })
}

/// Clamp a parsed reading the way [`coerce_result`] does.
pub fn clamp_reading(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_read_as_zero() {
        assert_eq!(coerce_result(""), Ok(0.0));
        assert_eq!(coerce_result("ND"), Ok(0.0));
        assert_eq!(coerce_result("--"), Ok(0.0));
        assert_eq!(coerce_result("-- n/a"), Ok(0.0));
    }

    #[test]
    fn non_finite_is_rejected() {
        assert!(coerce_result("inf").is_err());
        assert!(coerce_result("NaN").is_err());
    }

    #[test]
    fn negatives_are_clamped() {
        assert_eq!(coerce_result("-3.2"), Ok(0.0));
        assert_eq!(coerce_result("0"), Ok(0.0));
        assert_eq!(coerce_result(" 12.5 "), Ok(12.5));
    }

    #[test]
    fn text_is_rejected() {
        assert_eq!(
            coerce_result("n.d."),
            Err(InvalidResultValue {
                value: "n.d.".to_string()
            })
        );
    }

    #[test]
    fn extract_number_ignores_units() {
        assert_eq!(extract_number("67.9 %"), Some(67.9));
        assert_eq!(extract_number("120 ppm"), Some(120.0));
        assert_eq!(extract_number("n/a"), None);
        assert_eq!(extract_number("1.2.3"), None);
        assert_eq!(extract_number("-0.05 %"), Some(-0.05));
        assert_eq!(extract_number("Fe-free 3 %"), Some(3.0));
    }
}
