//! Per-file parse state: current line, accumulated results and diagnostics.

use chrono::{Local, NaiveDateTime};
use lims_model::{Diagnostic, FieldRecord, ImportSummary, RawResults, Severity};
use tracing::{debug, error, warn};

use crate::coerce::coerce_result;

/// State owned by one parser for one file.
#[derive(Debug, Clone)]
pub struct ParseSession {
    filename: String,
    line_number: usize,
    parsed_at: NaiveDateTime,
    results: RawResults,
    summary: ImportSummary,
}

impl ParseSession {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            line_number: 0,
            parsed_at: Local::now().naive_local(),
            results: RawResults::new(),
            summary: ImportSummary::new(),
        }
    }

    /// Fix the timestamp recorded in `DateTime` interims.
    #[must_use]
    pub fn with_parsed_at(mut self, parsed_at: NaiveDateTime) -> Self {
        self.parsed_at = parsed_at;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 1-based number of the physical line being parsed (0 before the first).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn set_line_number(&mut self, line_number: usize) {
        self.line_number = line_number;
    }

    /// Parse time as `YYYY/MM/DD HH:MM`.
    pub fn parsed_at_text(&self) -> String {
        self.parsed_at.format("%Y/%m/%d %H:%M").to_string()
    }

    pub fn results(&self) -> &RawResults {
        &self.results
    }

    pub fn summary(&self) -> &ImportSummary {
        &self.summary
    }

    pub fn add_result(&mut self, sample: &str, keyword: &str, record: FieldRecord) {
        debug!(sample, keyword, fields = record.fields.len(), "add result");
        self.results.add_result(sample, keyword, record);
    }

    pub fn append_result(&mut self, sample: &str, keyword: &str, record: FieldRecord) {
        debug!(sample, keyword, fields = record.fields.len(), "append result");
        self.results.append_result(sample, keyword, record);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Severity::Error, Diagnostic::new(message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Severity::Warning, Diagnostic::new(message));
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.record(Severity::Log, Diagnostic::new(message));
    }

    /// Error tied to the current line.
    pub fn line_error(&mut self, message: impl Into<String>, line: &str) {
        let diagnostic = Diagnostic::new(message).at_line(self.line_number, line);
        self.record(Severity::Error, diagnostic);
    }

    /// Warning tied to the current line.
    pub fn line_warn(&mut self, message: impl Into<String>, line: &str) {
        let diagnostic = Diagnostic::new(message).at_line(self.line_number, line);
        self.record(Severity::Warning, diagnostic);
    }

    /// Log entry tied to the current line.
    pub fn line_log(&mut self, message: impl Into<String>, line: &str) {
        let diagnostic = Diagnostic::new(message).at_line(self.line_number, line);
        self.record(Severity::Log, diagnostic);
    }

    /// Entry tied to an explicit line, for readers that track their own rows.
    pub fn record_at(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        line_number: usize,
        line: &str,
    ) {
        self.record(severity, Diagnostic::new(message).at_line(line_number, line));
    }

    /// Coerce `raw` for `column`, recording an error when it is not a number.
    pub fn coerce(&mut self, column: &str, raw: &str, line: &str) -> Option<f64> {
        match coerce_result(raw) {
            Ok(value) => Some(value),
            Err(invalid) => {
                self.line_error(format!("{invalid} in column ({column})"), line);
                None
            }
        }
    }

    /// Log the "End of file" summary line.
    pub fn log_end_of_file(&mut self) {
        let message = format!(
            "End of file reached successfully: {} objects, {} analyses, {} results",
            self.results.object_count(),
            self.results.analysis_count(),
            self.results.result_count()
        );
        self.log(message);
    }

    pub fn into_parts(self) -> (RawResults, ImportSummary) {
        (self.results, self.summary)
    }

    fn record(&mut self, severity: Severity, diagnostic: Diagnostic) {
        match severity {
            Severity::Error => error!(filename = %self.filename, "{diagnostic}"),
            Severity::Warning => warn!(filename = %self.filename, "{diagnostic}"),
            Severity::Log => debug!(filename = %self.filename, "{diagnostic}"),
        }
        self.summary.push(severity, diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_records_error_with_column_and_line() {
        let mut session = ParseSession::new("run.csv");
        session.set_line_number(4);
        assert_eq!(session.coerce("mzProd", "abc", "a,abc"), None);
        assert_eq!(session.coerce("mzProd", "--", "a,--"), Some(0.0));
        let errors = &session.summary().errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "No valid number abc in column (mzProd)");
        assert_eq!(errors[0].line_number, Some(4));
        assert_eq!(errors[0].line.as_deref(), Some("a,abc"));
    }

    #[test]
    fn end_of_file_reports_counts() {
        let mut session = ParseSession::new("run.csv");
        session.add_result("S1", "fe", FieldRecord::new().with_field("fe", 1.0));
        session.log_end_of_file();
        assert_eq!(
            session.summary().log[0].message,
            "End of file reached successfully: 1 objects, 1 analyses, 1 results"
        );
    }
}
