//! The harness driver.
//!
//! Runs test cases strictly sequentially in discovery order: build the
//! expected output from both annotated sources, execute the case binary,
//! compare, record the outcome. Per-case problems (launch failure, timeout,
//! mismatch, broken annotations) become failing outcomes and never abort the
//! run; only a missing test list is fatal, and that surfaces before the
//! first case starts.

use serde::Serialize;

use crate::compare::{outputs_match, render_diff};
use crate::config::{FragmentOrder, HarnessConfig};
use crate::discovery::{discover_cases, TestCase};
use crate::errors::HarnessError;
use crate::exec::{ExecutionResult, Executor};
use crate::expect::{self, ExpectError};
use crate::report::Reporter;
use termcolor::WriteColor;

/// Final status of one test case.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Mismatch {
        expected: String,
        actual: String,
        diff: String,
    },
    TimedOut,
    LaunchFailed {
        message: String,
    },
    /// The case's annotations could not be turned into an expectation
    /// (unreadable source file or a bad `expect_for_pid:` payload).
    BadExpectation {
        message: String,
    },
}

/// Outcome of one test case, as reported and serialized.
#[derive(Debug, Clone, Serialize)]
pub struct TestOutcome {
    pub id: String,
    #[serde(flatten)]
    pub status: TestStatus,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.status, TestStatus::Passed)
    }
}

/// Aggregate result of a run. `passed + failed` always equals the number of
/// cases attempted.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Drives a whole conformance run.
pub struct Harness {
    config: HarnessConfig,
    executor: Executor,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        let executor = Executor::new(config.timeout, config.greeting.clone());
        Self { config, executor }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs every discovered case (optionally narrowed by an id substring
    /// filter), reporting progress as each case completes.
    pub fn run<W: WriteColor>(
        &self,
        filter: Option<&str>,
        reporter: &mut Reporter<W>,
    ) -> Result<RunSummary, HarnessError> {
        let cases = discover_cases(&self.config)?;
        let mut summary = RunSummary {
            passed: 0,
            failed: 0,
            outcomes: Vec::new(),
        };
        for case in &cases {
            if let Some(filter) = filter {
                if !case.id.contains(filter) {
                    continue;
                }
            }
            reporter.case_started(&case.id);
            let outcome = self.run_case(case);
            if outcome.passed() {
                summary.passed += 1;
            } else {
                summary.failed += 1;
            }
            reporter.case_finished(&outcome, self.executor.timeout());
            summary.outcomes.push(outcome);
        }
        reporter.summary(&summary);
        Ok(summary)
    }

    /// The full expected output for one case: device fragments and host
    /// fragments concatenated in the configured order, newline-joined.
    pub fn expected_output(&self, case: &TestCase) -> Result<String, ExpectError> {
        let device = expect::expected_lines_from_file(&case.device_source(), self.config.nprocs)?;
        let host = expect::expected_lines_from_file(&case.host_source(), self.config.nprocs)?;
        let ordered = match self.config.order {
            FragmentOrder::DeviceFirst => device.into_iter().chain(host),
            FragmentOrder::HostFirst => host.into_iter().chain(device),
        };
        Ok(ordered.collect::<Vec<_>>().join("\n"))
    }

    fn run_case(&self, case: &TestCase) -> TestOutcome {
        let expected = match self.expected_output(case) {
            Ok(expected) => expected,
            Err(err) => {
                return TestOutcome {
                    id: case.id.clone(),
                    status: TestStatus::BadExpectation {
                        message: err.to_string(),
                    },
                }
            }
        };
        let status = match self.executor.run(&case.executable()) {
            ExecutionResult::LaunchFailed(err) => TestStatus::LaunchFailed {
                message: err.to_string(),
            },
            ExecutionResult::TimedOut => TestStatus::TimedOut,
            ExecutionResult::Completed(actual) => {
                if outputs_match(&actual, &expected, self.config.mode) {
                    TestStatus::Passed
                } else {
                    let diff = render_diff(&expected, &actual);
                    TestStatus::Mismatch {
                        expected,
                        actual,
                        diff,
                    }
                }
            }
        };
        TestOutcome {
            id: case.id.clone(),
            status,
        }
    }
}
