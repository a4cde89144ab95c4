//! Console and JSON reporting.
//!
//! One progress line per case as it starts, a failure block with a colored
//! diff as soon as a case fails, and a two-line summary: the counts, then
//! the sentinel line whose trailing token is exactly `SUCCESS` or `FAILURE`.
//! Automation consuming the harness greps the sentinel line; the exit code
//! merely mirrors it.

use std::io::Write;
use std::time::Duration;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::harness::{RunSummary, TestOutcome, TestStatus};

/// Writes the human-facing run report to a color-capable stream.
pub struct Reporter<W: WriteColor> {
    out: W,
}

impl Reporter<StandardStream> {
    /// Reporter on stdout, honoring the configured color preference.
    pub fn stdout(use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn case_started(&mut self, id: &str) {
        let _ = writeln!(self.out, "Testing {}...", id);
    }

    pub fn case_finished(&mut self, outcome: &TestOutcome, timeout: Duration) {
        match &outcome.status {
            TestStatus::Passed => {}
            TestStatus::Mismatch { diff, .. } => {
                self.fail_line(&outcome.id, "output mismatch");
                self.print_diff(diff);
                let _ = writeln!(self.out);
            }
            TestStatus::TimedOut => {
                self.fail_line(&outcome.id, &format!("timed out after {:?}", timeout));
                let _ = writeln!(self.out);
            }
            TestStatus::LaunchFailed { message } => {
                self.fail_line(&outcome.id, &format!("could not launch: {}", message));
                let _ = writeln!(self.out);
            }
            TestStatus::BadExpectation { message } => {
                self.fail_line(&outcome.id, &format!("bad expectation: {}", message));
                let _ = writeln!(self.out);
            }
        }
    }

    pub fn summary(&mut self, summary: &RunSummary) {
        let _ = writeln!(self.out);
        if summary.succeeded() {
            let _ = writeln!(self.out, "All {} tests passed", summary.passed);
            self.colored_line("Unit tests SUCCESS", Color::Green);
        } else {
            let _ = writeln!(
                self.out,
                "{} tests failed, {} tests passed",
                summary.failed, summary.passed
            );
            self.colored_line("Unit tests FAILURE", Color::Red);
        }
    }

    fn fail_line(&mut self, id: &str, detail: &str) {
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(self.out, "FAIL");
        let _ = self.out.reset();
        let _ = writeln!(self.out, ": {}: {}", id, detail);
    }

    fn colored_line(&mut self, text: &str, color: Color) {
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.reset();
    }

    /// Rendered diff lines, recolored by their `+`/`-` prefix.
    fn print_diff(&mut self, diff: &str) {
        for line in diff.lines() {
            if line.starts_with('+') {
                let _ = self.out.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            } else if line.starts_with('-') {
                let _ = self.out.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
            } else {
                let _ = self.out.reset();
            }
            let _ = writeln!(self.out, "{}", line);
        }
        let _ = self.out.reset();
    }
}

/// Writes the machine-readable run report as one JSON document.
pub fn write_json<W: Write>(out: &mut W, summary: &RunSummary) -> std::io::Result<()> {
    let report = serde_json::json!({
        "total": summary.total(),
        "passed": summary.passed,
        "failed": summary.failed,
        "success": summary.succeeded(),
        "cases": summary.outcomes,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)
}
