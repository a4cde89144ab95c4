//! Fatal harness errors.
//!
//! Only conditions that make the whole run impossible live here; anything
//! that concerns a single test case is reported through its outcome and
//! never aborts the run.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("cannot read build description `{path}`")]
    #[diagnostic(
        code(ebsp_test::build_file_unreadable),
        help("the harness needs the build description to enumerate test cases")
    )]
    BuildFileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no `{key}` target list in `{path}`")]
    #[diagnostic(
        code(ebsp_test::missing_target_list),
        help("declare the test cases as `{key} case_one case_two ...`")
    )]
    MissingTargetList {
        key: String,
        path: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a line starting with `{key}` in this file")]
        span: SourceSpan,
    },
}
