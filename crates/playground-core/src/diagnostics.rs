//! Toolchain output classification.
//!
//! The remote toolchain reports problems as `basename:line:column: message` lines. Everything
//! else it prints (progress, program output) is plain text. [`DiagnosticParser`] classifies
//! output lines one at a time and keeps the error tally used by [`RunSummary`].

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DIAGNOSTIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9._-]+):(\d+):(\d+):(.*)$").expect("diagnostic pattern is valid")
});

/// A location-addressed line of toolchain output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Resource the diagnostic refers to.
    pub basename: String,
    /// One-based line, as reported.
    pub line: usize,
    /// Zero-based buffer column (the reported one-based column minus one).
    pub column: usize,
    /// Remainder of the line after the location prefix.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.basename,
            self.line,
            self.column + 1,
            self.message
        )
    }
}

/// A classified output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// A line naming a source location.
    Diagnostic(Diagnostic),
    /// Anything else.
    Text(String),
}

impl OutputLine {
    /// The diagnostic carried by this line, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Diagnostic(d) => Some(d),
            Self::Text(_) => None,
        }
    }
}

/// Final verdict of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    /// The toolchain exited with a non-zero status.
    ExitStatus(i32),
    /// Zero status and no diagnostics.
    Success,
    /// Zero status and exactly one diagnostic.
    OneError,
    /// Zero status and several diagnostics.
    Errors(usize),
}

impl RunSummary {
    /// Returns `true` only for [`RunSummary::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitStatus(status) => write!(f, "exit status: {status}"),
            Self::Success => f.write_str("success"),
            Self::OneError => f.write_str("one error"),
            Self::Errors(n) => write!(f, "{n} errors"),
        }
    }
}

/// Classifies output lines and counts diagnostics.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticParser {
    error_count: usize,
}

impl DiagnosticParser {
    /// Create a parser with a zero tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one output line, counting it if it is a diagnostic.
    pub fn parse_line(&mut self, line: &str) -> OutputLine {
        match parse_diagnostic(line) {
            Some(diagnostic) => {
                self.error_count += 1;
                OutputLine::Diagnostic(diagnostic)
            }
            None => OutputLine::Text(line.to_string()),
        }
    }

    /// Number of diagnostics seen so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Verdict for a job that finished with `status`.
    pub fn summary(&self, status: i32) -> RunSummary {
        if status != 0 {
            return RunSummary::ExitStatus(status);
        }
        match self.error_count {
            0 => RunSummary::Success,
            1 => RunSummary::OneError,
            n => RunSummary::Errors(n),
        }
    }

    /// Reset the tally.
    pub fn reset(&mut self) {
        self.error_count = 0;
    }
}

fn parse_diagnostic(line: &str) -> Option<Diagnostic> {
    let caps = DIAGNOSTIC_PATTERN.captures(line)?;
    let line_no: usize = caps[2].parse().ok()?;
    let column: usize = caps[3].parse().ok()?;
    if line_no == 0 || column == 0 {
        return None;
    }
    Some(Diagnostic {
        basename: caps[1].to_string(),
        line: line_no,
        column: column - 1,
        message: caps[4].trim_start().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diagnostic_line() {
        let mut parser = DiagnosticParser::new();
        let line = parser.parse_line("main.adb:12:5: error: missing semicolon");
        assert_eq!(
            line,
            OutputLine::Diagnostic(Diagnostic {
                basename: "main.adb".to_string(),
                line: 12,
                column: 4,
                message: "error: missing semicolon".to_string(),
            })
        );
        assert_eq!(parser.error_count(), 1);
    }

    #[test]
    fn test_plain_lines_are_not_counted() {
        let mut parser = DiagnosticParser::new();
        for text in [
            "compiling...",
            "main.adb:0:1: zero line",
            "main.adb:3:0: zero column",
            "my file.adb:1:1: space in name",
            "main.adb:12: no column",
        ] {
            assert_eq!(parser.parse_line(text), OutputLine::Text(text.to_string()));
        }
        assert_eq!(parser.error_count(), 0);
    }

    #[test]
    fn test_summary() {
        let mut parser = DiagnosticParser::new();
        assert_eq!(parser.summary(0).to_string(), "success");
        parser.parse_line("a.adb:1:1: x");
        assert_eq!(parser.summary(0).to_string(), "one error");
        parser.parse_line("b.ads:2:3: y");
        assert_eq!(parser.summary(0).to_string(), "2 errors");
        assert_eq!(parser.summary(1).to_string(), "exit status: 1");
        parser.reset();
        assert!(parser.summary(0).is_success());
    }

    #[test]
    fn test_display_restores_reported_column() {
        let mut parser = DiagnosticParser::new();
        let out = parser.parse_line("main.adb:12:5: error: missing semicolon");
        let d = out.diagnostic().unwrap();
        assert_eq!(d.to_string(), "main.adb:12:5: error: missing semicolon");
    }
}
