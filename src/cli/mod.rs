//! The ebsp-test command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library functions. Fatal problems render as miette diagnostics on
//! stderr with exit code 2; a completed run exits 0 or 1 to mirror the
//! sentinel line.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use miette::Report;

use crate::cli::args::{Command, HarnessArgs};
use crate::compare::CompareMode;
use crate::config::{FragmentOrder, HarnessConfig};
use crate::discovery::{discover_cases, unlisted_case_dirs, TestCase};
use crate::harness::Harness;
use crate::report::{write_json, Reporter};

pub mod args;

/// The main entry point for the CLI.
pub fn run() -> ! {
    let args = HarnessArgs::parse();

    let result = match args.command {
        Command::Run {
            root,
            nprocs,
            timeout,
            strict_lines,
            host_first,
            filter,
            json,
            no_color,
        } => handle_run(RunOptions {
            root,
            nprocs,
            timeout,
            strict_lines,
            host_first,
            filter,
            json,
            no_color,
        }),
        Command::List { root } => handle_list(root),
        Command::Expected { id, root, nprocs } => handle_expected(id, root, nprocs),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(report) => {
            eprintln!("{:?}", report);
            process::exit(2);
        }
    }
}

struct RunOptions {
    root: PathBuf,
    nprocs: u32,
    timeout: u64,
    strict_lines: bool,
    host_first: bool,
    filter: Option<String>,
    json: bool,
    no_color: bool,
}

fn handle_run(opts: RunOptions) -> Result<i32, Report> {
    let config = HarnessConfig {
        suite_root: opts.root,
        nprocs: opts.nprocs,
        timeout: Duration::from_secs(opts.timeout),
        mode: if opts.strict_lines {
            CompareMode::Lines
        } else {
            CompareMode::Collapsed
        },
        order: if opts.host_first {
            FragmentOrder::HostFirst
        } else {
            FragmentOrder::DeviceFirst
        },
        use_colors: !opts.no_color && atty::is(atty::Stream::Stdout),
        ..HarnessConfig::default()
    };

    let use_colors = config.use_colors;
    let harness = Harness::new(config);
    let mut reporter = Reporter::stdout(use_colors);
    let summary = harness
        .run(opts.filter.as_deref(), &mut reporter)
        .map_err(Report::new)?;

    if opts.json {
        write_json(&mut std::io::stdout(), &summary).map_err(Report::msg)?;
    }

    Ok(if summary.succeeded() { 0 } else { 1 })
}

fn handle_list(root: PathBuf) -> Result<i32, Report> {
    let config = HarnessConfig {
        suite_root: root,
        ..HarnessConfig::default()
    };
    let cases = discover_cases(&config).map_err(Report::new)?;
    for case in &cases {
        println!("{}", case.id);
    }
    let ids: Vec<String> = cases.into_iter().map(|c| c.id).collect();
    for stray in unlisted_case_dirs(&config.suite_root, &ids) {
        eprintln!(
            "warning: `{}` has sources on disk but is not in the target list",
            stray
        );
    }
    Ok(0)
}

fn handle_expected(id: String, root: PathBuf, nprocs: u32) -> Result<i32, Report> {
    let config = HarnessConfig {
        suite_root: root.clone(),
        nprocs,
        ..HarnessConfig::default()
    };
    let harness = Harness::new(config);
    let case = TestCase::new(id, root);
    let expected = harness.expected_output(&case).map_err(Report::new)?;
    println!("{}", expected);
    Ok(0)
}
