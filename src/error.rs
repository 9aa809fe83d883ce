// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for wcag-zoo

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZooError>;

#[derive(Error, Debug)]
pub enum ZooError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Recovered by the fail-open color parser (opaque black).
    #[error("Malformed color value: {0:?}")]
    MalformedColorValue(String),

    /// Recovered by skipping the single declaration.
    #[error("Malformed style declaration: {0:?}")]
    MalformedStyleDeclaration(String),

    /// Recovered by ignoring the declaration when resolving font size.
    #[error("Unsupported font size unit: {0:?}")]
    UnsupportedFontUnit(String),

    #[error("Unable to resolve external stylesheet {href:?} (looked for {path})")]
    UnresolvableExternalStylesheet { href: String, path: PathBuf },

    #[error("Document parse failure: {0}")]
    DocumentParse(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Unknown validator: {0}")]
    UnknownValidator(String),

    #[error("Contrast evaluation error: {0}")]
    Contrast(String),

    /// A validator was handed an element it can't judge.
    #[error("Unexpected element <{0}>")]
    UnexpectedElement(String),
}
