// SPDX-License-Identifier: PMPL-1.0-or-later
//! Batch driver for running validators across files and directories.
//!
//! Every file gets its own results. A file that can't be read or parsed is
//! reported with its error and the batch moves on.

use crate::config::Config;
use crate::document::StyledDocument;
use crate::error::Result;
use crate::results::ValidationResults;
use crate::validators::Suite;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// File extensions picked up when walking a directory
const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "_build", "vendor", ".next", ".nuxt", "coverage",
];

/// Name used for documents read from standard input
pub const STDIN_NAME: &str = "<stdin>";

/// Results for one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub results: ValidationResults,
    /// Set when the file could not be read, decoded or styled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn failed(file: String, error: impl std::fmt::Display) -> Self {
        Self {
            file,
            results: ValidationResults::new(),
            error: Some(error.to_string()),
        }
    }

    /// Whether this file counts against the exit status
    pub fn is_failure(&self, warnings_as_errors: bool) -> bool {
        self.error.is_some()
            || self.results.has_failures()
            || (warnings_as_errors && self.results.has_warnings())
    }
}

/// Expand the given paths into the list of files to validate.
///
/// Files are taken as given; directories are walked for HTML files.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        info!("Scanning directory: {}", path.display());
        for entry in WalkDir::new(path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_str().unwrap_or("");
                if e.depth() > 0 && e.file_type().is_dir() {
                    return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
                }
                true
            })
        {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let ext = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();
            if SCANNABLE_EXTENSIONS.contains(&ext.as_str()) {
                files.push(entry.into_path());
            }
        }
    }

    files
}

/// Validate raw document bytes
pub fn validate_source(bytes: &[u8], suite: &Suite, config: &Config) -> Result<ValidationResults> {
    let document = StyledDocument::from_bytes(bytes, config)?;
    suite.validate(&document, config)
}

fn report(name: String, bytes: &[u8], suite: &Suite, config: &Config) -> FileReport {
    match validate_source(bytes, suite, config) {
        Ok(results) => FileReport {
            file: name,
            results,
            error: None,
        },
        Err(err) => {
            warn!("{}: {}", name, err);
            FileReport::failed(name, err)
        }
    }
}

/// Validate a single file
pub fn scan_file(path: &Path, suite: &Suite, config: &Config) -> FileReport {
    let name = path.display().to_string();
    info!("Validating {} with {}", name, suite.name());
    match std::fs::read(path) {
        Ok(bytes) => report(name, &bytes, suite, config),
        Err(err) => {
            warn!("Could not read {}: {}", name, err);
            FileReport::failed(name, err)
        }
    }
}

/// Validate a document read from a stream such as stdin
pub fn scan_reader<R: Read>(mut reader: R, name: &str, suite: &Suite, config: &Config) -> FileReport {
    let mut bytes = Vec::new();
    match reader.read_to_end(&mut bytes) {
        Ok(_) => report(name.to_string(), &bytes, suite, config),
        Err(err) => FileReport::failed(name.to_string(), err),
    }
}

/// Validate every file under the given paths, in order
pub fn scan_paths(paths: &[PathBuf], suite: &Suite, config: &Config) -> Vec<FileReport> {
    let files = collect_files(paths);
    let reports: Vec<_> = files
        .iter()
        .map(|file| scan_file(file, suite, config))
        .collect();

    info!(
        "Validated {} files, {} with failures",
        reports.len(),
        reports.iter().filter(|r| r.results.has_failures()).count()
    );
    reports
}
