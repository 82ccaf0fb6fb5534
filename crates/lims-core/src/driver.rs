//! Line-oriented parsing loop shared by the line-driven vendor parsers.

use tracing::info_span;

use crate::session::ParseSession;

/// What the driver does after a line has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineInstruction {
    Continue,
    /// Skip the next `n` non-blank lines.
    Skip(usize),
    /// Stop immediately; the file is treated as failed.
    Abort,
}

/// A stateful parser fed one trimmed, non-blank line at a time.
pub trait LineParser {
    fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction;
}

/// Feed `lines` to `parser`, returning whether the file was parsed to the end.
///
/// Line numbers are 1-based and count blank lines too. Blank lines never
/// reach the parser and do not consume a pending skip.
pub fn drive_lines<P>(parser: &mut P, lines: &[String], session: &mut ParseSession) -> bool
where
    P: LineParser + ?Sized,
{
    let span = info_span!("parse", filename = %session.filename(), line_count = lines.len());
    let _guard = span.enter();
    session.log(format!("Parsing file {}", session.filename()));
    let mut pending_skip = 0usize;
    for (index, raw) in lines.iter().enumerate() {
        session.set_line_number(index + 1);
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if pending_skip > 0 {
            pending_skip -= 1;
            continue;
        }
        match parser.parse_line(line, session) {
            LineInstruction::Continue => {}
            LineInstruction::Skip(count) => pending_skip = count,
            LineInstruction::Abort => {
                session.error("File processing finished due to critical errors");
                return false;
            }
        }
    }
    session.log_end_of_file();
    true
}

#[cfg(test)]
mod tests {
    use lims_model::FieldRecord;

    use super::*;

    /// Stores every line it sees; `skip N` and `abort` lines steer the driver.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(usize, String)>,
    }

    impl LineParser for Recorder {
        fn parse_line(&mut self, line: &str, session: &mut ParseSession) -> LineInstruction {
            self.seen.push((session.line_number(), line.to_string()));
            if let Some(count) = line.strip_prefix("skip ") {
                return LineInstruction::Skip(count.parse().unwrap_or(0));
            }
            if line == "abort" {
                return LineInstruction::Abort;
            }
            session.add_result(line, "kw", FieldRecord::new().with_field("kw", 1.0));
            LineInstruction::Continue
        }
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|line| (*line).to_string()).collect()
    }

    #[test]
    fn blank_lines_are_counted_but_not_parsed() {
        let mut parser = Recorder::default();
        let mut session = ParseSession::new("run.csv");
        let ok = drive_lines(&mut parser, &lines(&["  a  ", "", "   ", "b"]), &mut session);
        assert!(ok);
        assert_eq!(parser.seen, vec![(1, "a".to_string()), (4, "b".to_string())]);
        assert_eq!(session.summary().log[0].message, "Parsing file run.csv");
        assert_eq!(
            session.summary().log[1].message,
            "End of file reached successfully: 2 objects, 2 analyses, 2 results"
        );
    }

    #[test]
    fn skip_ignores_blank_lines() {
        let mut parser = Recorder::default();
        let mut session = ParseSession::new("run.csv");
        drive_lines(
            &mut parser,
            &lines(&["skip 2", "", "x", "", "y", "z"]),
            &mut session,
        );
        let seen: Vec<&str> = parser.seen.iter().map(|(_, line)| line.as_str()).collect();
        assert_eq!(seen, vec!["skip 2", "z"]);
    }

    #[test]
    fn abort_stops_immediately_and_keeps_partial_results() {
        let mut parser = Recorder::default();
        let mut session = ParseSession::new("run.csv");
        let ok = drive_lines(&mut parser, &lines(&["a", "abort", "b"]), &mut session);
        assert!(!ok);
        assert_eq!(parser.seen.len(), 2);
        assert!(session.results().contains_sample("a"));
        assert!(!session.results().contains_sample("b"));
        assert_eq!(
            session.summary().errors[0].message,
            "File processing finished due to critical errors"
        );
    }
}
