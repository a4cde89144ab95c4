//! Scanner for expectation markers embedded in source comments.
//!
//! Two marker kinds exist, both line-comment annotations with a parenthesized
//! payload:
//!
//! ```c
//! printf("Done"); // expect: (Done)
//! // expect_for_pid: ((pid - 1) % 16)
//! ```
//!
//! A marker may follow other code or comment text on its line. The payload
//! runs to the matching close parenthesis, with nesting tracked and double
//! quotes respected, so payloads such as `((pid - 1) % 16)` and
//! `("packets: 2")` survive intact. Text without a closing parenthesis on the
//! same line is not a marker and is skipped.

const PLAIN_TOKEN: &str = "expect: (";
const PID_TOKEN: &str = "expect_for_pid: (";

/// Which annotation form a marker uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// `expect: (...)`, payload taken verbatim as one expected line.
    Plain,
    /// `expect_for_pid: (...)`, payload evaluated once per worker id.
    PerPid,
}

/// One expectation annotation, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub payload: String,
    /// 1-based source line, for diagnostics.
    pub line: usize,
}

/// Scans the entire text for markers, in order of first appearance.
///
/// Returns an empty vector when the text contains no markers.
pub fn scan_markers(source: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        scan_line(line, idx + 1, &mut markers);
    }
    markers
}

fn scan_line(line: &str, line_no: usize, out: &mut Vec<Marker>) {
    let mut rest = line;
    loop {
        // The pid token embeds the word "expect" but not the plain token, so
        // searching for both and taking the leftmost match keeps the two
        // grammars disjoint.
        let plain = rest.find(PLAIN_TOKEN).map(|at| (at, MarkerKind::Plain));
        let pid = rest.find(PID_TOKEN).map(|at| (at, MarkerKind::PerPid));
        let found = match (plain, pid) {
            (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        };
        let Some((at, kind)) = found else {
            return;
        };
        let token_len = match kind {
            MarkerKind::Plain => PLAIN_TOKEN.len(),
            MarkerKind::PerPid => PID_TOKEN.len(),
        };
        // The token itself ends with the opening parenthesis.
        let body = &rest[at + token_len..];
        match payload_end(body) {
            Some(end) => {
                out.push(Marker {
                    kind,
                    payload: body[..end].to_string(),
                    line: line_no,
                });
                rest = &body[end + 1..];
            }
            None => {
                rest = body;
            }
        }
    }
}

/// Index of the parenthesis closing the payload, or `None` when the payload
/// never closes. Parentheses inside double-quoted strings do not count.
fn payload_end(body: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
