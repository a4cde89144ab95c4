//! Per-worker expansion of `expect_for_pid:` markers.
//!
//! Expansion is a textual preprocessing pass over the whole source. It runs
//! before plain extraction because it emits new `expect: (...)` lines that
//! the scanner then consumes like any other plain marker. Each parametrized
//! marker becomes one plain marker per worker id:
//!
//! ```text
//! // expect_for_pid: (1000 + pid)        with 2 workers becomes
//! // expect: (00: 1000)
//! // expect: (01: 1001)
//! ```
//!
//! The pass is idempotent: expanded text contains only plain markers, so a
//! second application is a no-op. Sources with no parametrized markers pass
//! through unchanged.

use super::expr;
use super::markers::{scan_markers, MarkerKind};
use super::ExpectError;

/// Expands every `expect_for_pid:` marker into `nprocs` plain markers.
pub fn expand_pid_markers(source: &str, nprocs: u32) -> Result<String, ExpectError> {
    if !source.contains("expect_for_pid:") {
        return Ok(source.to_string());
    }

    let mut out = String::with_capacity(source.len());
    for (idx, line) in source.lines().enumerate() {
        let pid_markers: Vec<_> = scan_markers(line)
            .into_iter()
            .filter(|m| m.kind == MarkerKind::PerPid)
            .collect();
        if pid_markers.is_empty() {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        // The line is replaced wholesale; surrounding code on a marker line
        // only matters to the compiler, not to extraction.
        for marker in pid_markers {
            for pid in 0..nprocs {
                let value = expr::eval(&marker.payload, i64::from(pid)).map_err(|source| {
                    ExpectError::Payload {
                        payload: marker.payload.clone(),
                        line: idx + 1,
                        source,
                    }
                })?;
                out.push_str(&format!("// expect: ({:02}: {})\n", pid, value));
            }
        }
    }
    Ok(out)
}
