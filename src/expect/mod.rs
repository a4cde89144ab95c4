//! Expectation engine: turns annotated source text into expected output.
//!
//! The pipeline has two stages, run in a fixed order:
//!
//! 1. [`expand::expand_pid_markers`] rewrites every parametrized
//!    `expect_for_pid:` marker into one plain marker per worker id.
//! 2. [`markers::scan_markers`] collects the plain `expect:` payloads in
//!    order of first appearance.
//!
//! [`expected_lines`] composes both stages; [`expected_lines_from_file`] adds
//! the file read. Worker count is always an explicit parameter, never a
//! process-wide constant.

use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

pub mod expand;
pub mod expr;
pub mod markers;

pub use expand::expand_pid_markers;
pub use markers::{scan_markers, Marker, MarkerKind};

#[derive(Debug, Error, Diagnostic)]
pub enum ExpectError {
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(ebsp_test::expect::unreadable_source))]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("line {line}: bad expect_for_pid payload `{payload}`: {source}")]
    #[diagnostic(code(ebsp_test::expect::bad_payload))]
    Payload {
        payload: String,
        line: usize,
        source: expr::ExprError,
    },
}

/// Expected output lines declared by a block of source text.
pub fn expected_lines(source: &str, nprocs: u32) -> Result<Vec<String>, ExpectError> {
    let expanded = expand_pid_markers(source, nprocs)?;
    Ok(scan_markers(&expanded)
        .into_iter()
        .filter(|m| m.kind == MarkerKind::Plain)
        .map(|m| m.payload)
        .collect())
}

/// Reads a source file and extracts its expected output lines.
pub fn expected_lines_from_file(path: &Path, nprocs: u32) -> Result<Vec<String>, ExpectError> {
    let source = std::fs::read_to_string(path).map_err(|source| ExpectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    expected_lines(&source, nprocs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_has_no_expectations() {
        assert!(expected_lines("", 16).unwrap().is_empty());
        assert!(expected_lines("int x = 3;\n", 16).unwrap().is_empty());
    }

    #[test]
    fn plain_and_parametrized_markers_combine() {
        let src = "\
// expect: (start)
// expect_for_pid: (pid * 2)
// expect: (end)
";
        let lines = expected_lines(src, 2).unwrap();
        assert_eq!(lines, vec!["start", "00: 0", "01: 2", "end"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = expected_lines_from_file(Path::new("/nonexistent/e_case.c"), 16).unwrap_err();
        assert!(matches!(err, ExpectError::Io { .. }));
    }
}
