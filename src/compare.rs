//! Output normalization, comparison, and line diffing.
//!
//! The canonical comparison rule collapses all line terminators and compares
//! the remaining text as a single unit, so a case passes regardless of how
//! the output happens to be wrapped across lines. The strict mode compares
//! line by line after CRLF normalization. Both modes are always available;
//! which one a run uses comes from the harness configuration.
//!
//! Diffs are computed in-process with an LCS changeset over lines; no
//! external diff tool is invoked.

use difference::{Changeset, Difference};

/// How actual and expected output are normalized before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// Collapse all newlines and compare one unit. The canonical rule.
    #[default]
    Collapsed,
    /// Compare line by line, preserving line structure.
    Lines,
}

/// True when `actual` matches `expected` under the given mode.
pub fn outputs_match(actual: &str, expected: &str, mode: CompareMode) -> bool {
    match mode {
        CompareMode::Collapsed => collapse(actual) == collapse(expected),
        CompareMode::Lines => normalize_lines(actual) == normalize_lines(expected),
    }
}

fn collapse(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

fn normalize_lines(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    unified.trim_end_matches('\n').to_string()
}

/// Line diff of the non-collapsed forms, for failure reports.
///
/// Lines only in `expected` are prefixed `-`, lines only in `actual` are
/// prefixed `+`, common lines get two spaces.
pub fn render_diff(expected: &str, actual: &str) -> String {
    let changeset = Changeset::new(
        &normalize_lines(expected),
        &normalize_lines(actual),
        "\n",
    );
    let mut out = String::new();
    for diff in &changeset.diffs {
        let (prefix, chunk) = match diff {
            Difference::Same(chunk) => ("  ", chunk),
            Difference::Rem(chunk) => ("- ", chunk),
            Difference::Add(chunk) => ("+ ", chunk),
        };
        for line in chunk.lines() {
            out.push_str(prefix);
            out.push_str(line);
            out.push('\n');
        }
        // An empty chunk still stands for one (empty) line.
        if chunk.is_empty() {
            out.push_str(prefix.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_ignores_line_wrapping() {
        assert!(outputs_match("Hello\nWorld\n", "HelloWorld", CompareMode::Collapsed));
        assert!(outputs_match("a\r\nb\r\n", "ab", CompareMode::Collapsed));
        assert!(!outputs_match("Hello", "Goodbye", CompareMode::Collapsed));
    }

    #[test]
    fn collapsed_still_sees_content_order() {
        assert!(!outputs_match("World\nHello", "Hello\nWorld", CompareMode::Collapsed));
    }

    #[test]
    fn lines_mode_is_strict_about_structure() {
        assert!(!outputs_match("HelloWorld", "Hello\nWorld", CompareMode::Lines));
        assert!(outputs_match("Hello\nWorld\n", "Hello\nWorld", CompareMode::Lines));
        assert!(outputs_match("a\r\nb", "a\nb", CompareMode::Lines));
    }

    #[test]
    fn diff_mentions_both_sides() {
        let diff = render_diff("Hello", "Goodbye");
        assert!(diff.contains("- Hello"));
        assert!(diff.contains("+ Goodbye"));
    }

    #[test]
    fn diff_keeps_common_lines_unmarked() {
        let diff = render_diff("same\nold\n", "same\nnew\n");
        assert!(diff.contains("  same"));
        assert!(diff.contains("- old"));
        assert!(diff.contains("+ new"));
    }

    #[test]
    fn identical_inputs_diff_to_common_lines_only() {
        let diff = render_diff("a\nb", "a\nb");
        assert!(!diff.contains("- "));
        assert!(!diff.contains("+ "));
    }
}
