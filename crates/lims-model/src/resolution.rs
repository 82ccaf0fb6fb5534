//! Analyte keyword resolution against the analyses configured for a sample.

use serde::{Deserialize, Serialize};

/// Outcome of matching a derived keyword against configured keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "keywords", rename_all = "snake_case")]
pub enum AnalyteResolution {
    Found(String),
    NotFound,
    Ambiguous(Vec<String>),
}

impl AnalyteResolution {
    pub fn found(&self) -> Option<&str> {
        match self {
            AnalyteResolution::Found(keyword) => Some(keyword),
            _ => None,
        }
    }
}

/// How a derived key is compared with a configured keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The configured keyword starts with the derived key (ASCII case-insensitive).
    ///
    /// The derived key is the shorter side: an instrument key `fe` selects
    /// `Fe_total`, while a configured `Cu` never matches a derived `Cu63`.
    /// A derived key that merely starts with a configured keyword is not a
    /// match; existing catalogs depend on this direction.
    #[default]
    Prefix,
    /// The configured keyword equals the derived key.
    Exact,
}

impl MatchMode {
    pub fn matches(self, configured: &str, derived: &str) -> bool {
        match self {
            MatchMode::Prefix => configured
                .get(..derived.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(derived)),
            MatchMode::Exact => configured == derived,
        }
    }
}

/// Resolve `derived` against `configured`.
///
/// Two or more matches are reported as ambiguous; nothing is ever picked
/// arbitrarily.
pub fn resolve_analyte<I, S>(derived: &str, configured: I, mode: MatchMode) -> AnalyteResolution
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut matches: Vec<String> = configured
        .into_iter()
        .filter(|keyword| mode.matches(keyword.as_ref(), derived))
        .map(|keyword| keyword.as_ref().to_string())
        .collect();
    match matches.len() {
        0 => AnalyteResolution::NotFound,
        1 => AnalyteResolution::Found(matches.remove(0)),
        _ => AnalyteResolution::Ambiguous(matches),
    }
}
