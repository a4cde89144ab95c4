//! Command-line arguments and subcommands.
//!
//! Declarative, type-safe argument parsing via `clap` derive.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "ebsp-test",
    version,
    about = "Conformance harness for host/device test binary pairs."
)]
pub struct HarnessArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run every declared test case and print the summary.
    Run {
        /// Suite root holding the build description, sources, and bin/.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Worker count used to expand expect_for_pid markers.
        #[arg(long, default_value_t = 16)]
        nprocs: u32,
        /// Per-case wall-clock timeout in seconds.
        #[arg(long, default_value_t = 3)]
        timeout: u64,
        /// Compare line by line instead of collapsing newlines.
        #[arg(long)]
        strict_lines: bool,
        /// Concatenate host fragments before device fragments.
        #[arg(long)]
        host_first: bool,
        /// Only run cases whose identifier contains this substring.
        #[arg(long)]
        filter: Option<String>,
        /// Append a JSON report after the human-readable summary.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        no_color: bool,
    },
    /// List declared cases and flag on-disk case directories missing from
    /// the target list.
    List {
        /// Suite root holding the build description.
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Print the fully expanded expected output for one case.
    Expected {
        /// Identifier of the case to expand.
        id: String,
        /// Suite root holding the case's source directory.
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Worker count used to expand expect_for_pid markers.
        #[arg(long, default_value_t = 16)]
        nprocs: u32,
    },
}
