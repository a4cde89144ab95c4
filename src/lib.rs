//! Conformance test harness for host/device binary pairs.
//!
//! Test cases are compiled programs whose expected output is declared inline
//! in their sources as comment annotations. The harness discovers the case
//! list from a build description file, turns the annotations of both source
//! roles into an expected-output string, runs each case binary under a
//! timeout with merged output capture, and diffs actual against expected.
//!
//! The pipeline, per case:
//!
//! 1. [`discovery`] reads the build description and derives the case's
//!    source and binary paths.
//! 2. [`expect`] expands `expect_for_pid:` markers across the configured
//!    worker count, then collects the plain `expect:` payloads.
//! 3. [`exec`] runs the binary with the fixed invocation contract.
//! 4. [`compare`] normalizes and compares, producing a line diff on
//!    mismatch.
//! 5. [`harness`] drives the above sequentially and aggregates outcomes;
//!    [`report`] renders the console stream, the sentinel line, and the
//!    optional JSON document.

pub mod cli;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod exec;
pub mod expect;
pub mod harness;
pub mod report;

pub use compare::CompareMode;
pub use config::{FragmentOrder, HarnessConfig};
pub use errors::HarnessError;
pub use harness::{Harness, RunSummary, TestOutcome, TestStatus};
