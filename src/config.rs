//! Harness configuration.
//!
//! Worker count, timeout, comparison mode, and fragment order are explicit
//! values threaded into the components that need them, so one process can
//! exercise several combinations independently.

use std::path::PathBuf;
use std::time::Duration;

use crate::compare::CompareMode;

/// Which role's expectation fragments come first in the concatenation.
///
/// The fixture corpus this harness was validated against puts device
/// fragments before host fragments; the host-first variant stays reachable
/// for suites written the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentOrder {
    #[default]
    DeviceFirst,
    HostFirst,
}

/// Configuration for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory holding the build description, the per-case source
    /// directories, and `bin/`.
    pub suite_root: PathBuf,
    /// Build description file name, relative to the suite root.
    pub build_file: String,
    /// Key whose line declares the space-separated test identifier list.
    pub target_key: String,
    /// Worker count used to expand `expect_for_pid:` markers.
    pub nprocs: u32,
    /// Wall-clock limit per test executable.
    pub timeout: Duration,
    /// The single fixed argument every test executable receives.
    pub greeting: String,
    pub order: FragmentOrder,
    pub mode: CompareMode,
    pub use_colors: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            suite_root: PathBuf::from("."),
            build_file: "Makefile".to_string(),
            target_key: "all:".to_string(),
            nprocs: 16,
            timeout: Duration::from_secs(3),
            greeting: "Hello World!".to_string(),
            order: FragmentOrder::default(),
            mode: CompareMode::default(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}
