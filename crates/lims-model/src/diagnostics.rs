//! Error, warning and log entries collected while parsing a file.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Log,
}

/// A single diagnostic message, optionally tied to a source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line_number: None,
            line: None,
        }
    }

    #[must_use]
    pub fn at_line(mut self, line_number: usize, line: impl Into<String>) -> Self {
        self.line_number = Some(line_number);
        self.line = Some(line.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(number) => write!(f, "Line {number}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The three diagnostic lists returned to the caller of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub errors: Vec<Diagnostic>,
    pub log: Vec<Diagnostic>,
    pub warns: Vec<Diagnostic>,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, diagnostic: Diagnostic) {
        match severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warns.push(diagnostic),
            Severity::Log => self.log.push(diagnostic),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(Diagnostic::new(message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warns.push(Diagnostic::new(message));
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.log.push(Diagnostic::new(message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Append every entry of `other`, keeping order.
    pub fn extend(&mut self, other: ImportSummary) {
        self.errors.extend(other.errors);
        self.log.extend(other.log);
        self.warns.extend(other.warns);
    }

    /// `{"errors": [...], "log": [...], "warns": [...]}` with rendered messages.
    pub fn to_json(&self) -> serde_json::Value {
        let render = |entries: &[Diagnostic]| -> Vec<serde_json::Value> {
            entries
                .iter()
                .map(|entry| serde_json::Value::String(entry.to_string()))
                .collect()
        };
        serde_json::json!({
            "errors": render(&self.errors),
            "log": render(&self.log),
            "warns": render(&self.warns),
        })
    }
}
