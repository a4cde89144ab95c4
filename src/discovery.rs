//! Test case discovery.
//!
//! The test list is external: the build description file declares it on a
//! single line under a fixed key, for example
//!
//! ```makefile
//! all: bsp_init bsp_pid bsp_memtest
//! ```
//!
//! The harness locates that line, splits the remainder on whitespace, and
//! builds one [`TestCase`] per identifier in declared order. For identifier
//! `X` the conventional layout, relative to the suite root, is:
//!
//! ```text
//! X/host_X.c    host-role source
//! X/e_X.c       device-role source
//! bin/host_X    compiled executable
//! ```
//!
//! A missing or keyless build description is fatal; nothing else here is.

use std::path::{Path, PathBuf};

use miette::NamedSource;
use walkdir::WalkDir;

use crate::config::HarnessConfig;
use crate::errors::HarnessError;

/// One conformance test case, immutable once constructed.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub id: String,
    suite_root: PathBuf,
}

impl TestCase {
    pub fn new(id: impl Into<String>, suite_root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            suite_root: suite_root.into(),
        }
    }

    pub fn host_source(&self) -> PathBuf {
        self.suite_root
            .join(&self.id)
            .join(format!("host_{}.c", self.id))
    }

    pub fn device_source(&self) -> PathBuf {
        self.suite_root
            .join(&self.id)
            .join(format!("e_{}.c", self.id))
    }

    pub fn executable(&self) -> PathBuf {
        self.suite_root.join("bin").join(format!("host_{}", self.id))
    }
}

/// Reads the build description and returns the declared cases in order.
pub fn discover_cases(config: &HarnessConfig) -> Result<Vec<TestCase>, HarnessError> {
    let build_path = config.suite_root.join(&config.build_file);
    let text = std::fs::read_to_string(&build_path).map_err(|source| {
        HarnessError::BuildFileUnreadable {
            path: build_path.display().to_string(),
            source,
        }
    })?;
    let ids = parse_target_list(&text, &config.target_key).ok_or_else(|| {
        HarnessError::MissingTargetList {
            key: config.target_key.clone(),
            path: build_path.display().to_string(),
            src: NamedSource::new(build_path.display().to_string(), text.clone()),
            span: (0, text.lines().next().map_or(0, str::len)).into(),
        }
    })?;
    Ok(ids
        .into_iter()
        .map(|id| TestCase::new(id, &config.suite_root))
        .collect())
}

/// Identifiers declared under `key`, or `None` when no line carries the key.
///
/// A present key with an empty remainder is a valid, empty suite.
fn parse_target_list(text: &str, key: &str) -> Option<Vec<String>> {
    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key) {
            return Some(rest.split_whitespace().map(str::to_string).collect());
        }
    }
    None
}

/// Names of depth-1 directories under the suite root that look like test
/// case directories (they hold a device-role source) but are not in `ids`.
///
/// Used by `list` to flag cases that exist on disk yet would never run.
pub fn unlisted_case_dirs(suite_root: &Path, ids: &[String]) -> Vec<String> {
    let mut unlisted = Vec::new();
    for entry in WalkDir::new(suite_root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if ids.iter().any(|id| id == name) {
            continue;
        }
        if entry.path().join(format!("e_{name}.c")).is_file() {
            unlisted.push(name.to_string());
        }
    }
    unlisted.sort();
    unlisted
}
