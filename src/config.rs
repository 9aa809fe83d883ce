// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for wcag-zoo
//!
//! A [`Config`] is the bundle every validator receives alongside the
//! document: conformance level, skip lists, hidden-element handling,
//! media rules for stylesheet flattening and the static file root.

use crate::error::{Result, ZooError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl Default for WcagLevel {
    fn default() -> Self {
        WcagLevel::AA
    }
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

impl std::str::FromStr for WcagLevel {
    type Err = ZooError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(WcagLevel::A),
            "AA" => Ok(WcagLevel::AA),
            "AAA" => Ok(WcagLevel::AAA),
            other => Err(ZooError::Config(format!("Unknown WCAG level: {}", other))),
        }
    }
}

/// Validation configuration shared by all validators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Conformance level to test against
    #[serde(default)]
    pub level: WcagLevel,

    /// Elements carrying any of these classes are not validated
    #[serde(default)]
    pub skip_classes: BTreeSet<String>,

    /// Elements with any of these ids are not validated
    #[serde(default)]
    pub skip_ids: BTreeSet<String>,

    /// Skip elements hidden with `display: none` or `visibility: hidden`
    #[serde(default)]
    pub ignore_hidden: bool,

    /// `@media` rules whose media text contains one of these are applied
    #[serde(default)]
    pub media_rules: BTreeSet<String>,

    /// Root directory that local stylesheet links resolve against
    #[serde(default = "default_static_path")]
    pub static_path: PathBuf,

    /// How much detail messages and console output carry
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: WcagLevel::default(),
            skip_classes: BTreeSet::new(),
            skip_ids: BTreeSet::new(),
            ignore_hidden: false,
            media_rules: BTreeSet::new(),
            static_path: default_static_path(),
            verbosity: default_verbosity(),
        }
    }
}

fn default_static_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_verbosity() -> u8 {
    1
}

impl Config {
    /// Set the conformance level
    pub fn with_level(mut self, level: WcagLevel) -> Self {
        self.level = level;
        self
    }

    /// Add classes to skip
    pub fn skip_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_classes.extend(
            classes
                .into_iter()
                .map(Into::into)
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        );
        self
    }

    /// Add ids to skip
    pub fn skip_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_ids.extend(
            ids.into_iter()
                .map(Into::into)
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty()),
        );
        self
    }

    /// Skip elements hidden by their styles
    pub fn ignoring_hidden(mut self, ignore: bool) -> Self {
        self.ignore_hidden = ignore;
        self
    }

    /// Add allow-listed media rules
    pub fn with_media_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Set the static file root
    pub fn with_static_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_path = path.into();
        self
    }

    /// Set output verbosity
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Load configuration from a path
///
/// Missing files yield the default configuration. Files ending in `.toml`
/// are read as TOML, everything else as YAML.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = if path.extension().map(|e| e == "toml").unwrap_or(false) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    debug!(?config, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.level, WcagLevel::AA);
        assert!(!config.ignore_hidden);
        assert_eq!(config.static_path, PathBuf::from("."));
        assert_eq!(config.verbosity, 1);
    }

    #[test]
    fn test_level_ordering_and_parse() {
        assert!(WcagLevel::A < WcagLevel::AA);
        assert!(WcagLevel::AA < WcagLevel::AAA);
        assert_eq!("aaa".parse::<WcagLevel>().unwrap(), WcagLevel::AAA);
        assert!("AAAA".parse::<WcagLevel>().is_err());
    }

    #[test]
    fn test_skip_lists_are_trimmed() {
        let config = Config::default()
            .skip_classes([" nav ", "", "footer"])
            .skip_ids(["main"]);
        assert!(config.skip_classes.contains("nav"));
        assert!(config.skip_classes.contains("footer"));
        assert_eq!(config.skip_classes.len(), 2);
        assert!(config.skip_ids.contains("main"));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/wcag-zoo.toml")).unwrap();
        assert_eq!(config.level, WcagLevel::AA);
    }

    #[test]
    fn test_load_toml_config() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "level = \"AAA\"\nskip_classes = [\"sr-only\"]\nignore_hidden = true\nmedia_rules = [\"screen\"]"
        )
        .unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.level, WcagLevel::AAA);
        assert!(config.skip_classes.contains("sr-only"));
        assert!(config.ignore_hidden);
        assert!(config.media_rules.contains("screen"));
        assert_eq!(config.verbosity, 1);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "level: A\nskip_ids: [banner]\nstatic_path: public").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.level, WcagLevel::A);
        assert!(config.skip_ids.contains("banner"));
        assert_eq!(config.static_path, PathBuf::from("public"));
    }
}
