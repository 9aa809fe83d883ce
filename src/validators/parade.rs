// SPDX-License-Identifier: PMPL-1.0-or-later
//! Run every registered validator over one document.

use super::registry;
use super::Validator;
use crate::config::Config;
use crate::document::StyledDocument;
use crate::error::{Result, ZooError};
use crate::results::ValidationResults;
use std::collections::BTreeSet;
use tracing::debug;

pub const ANIMAL: &str = "A parade of animals, each checking its own part of the page.";

/// Aggregate runner over the registry
#[derive(Debug, Clone, Default)]
pub struct Parade {
    exclude: BTreeSet<String>,
}

impl Parade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the named validators out; unknown names are an error
    pub fn excluding<I, S>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if !registry::names().any(|registered| registered == name) {
                return Err(ZooError::UnknownValidator(name));
            }
            self.exclude.insert(name);
        }
        Ok(self)
    }

    /// The validators that will run, alphabetically
    pub fn validators(&self) -> Vec<Box<dyn Validator>> {
        registry::all()
            .into_iter()
            .filter(|validator| !self.exclude.contains(validator.name()))
            .collect()
    }

    /// Validate one parsed document with each validator, merging all results
    pub fn validate(&self, document: &StyledDocument, config: &Config) -> Result<ValidationResults> {
        let mut total = ValidationResults::new();
        for validator in self.validators() {
            debug!("Parade: running {}", validator.name());
            total.merge(validator.validate(document, config)?);
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::OutcomeKind;

    const PAGE: &str = r#"<html><body>
        <h1>Title</h1>
        <h3 style="color: #eee">Skipped a level</h3>
        <img src="a.png">
        <a href="/" accesskey="h">Home</a>
    </body></html>"#;

    #[test]
    fn test_parade_merges_every_validator() {
        let doc = StyledDocument::parse_inline(PAGE);
        let results = Parade::new().validate(&doc, &Config::default()).unwrap();

        let codes: BTreeSet<_> = results
            .outcomes(OutcomeKind::Failure)
            .into_iter()
            .filter_map(|o| o.error_code.clone())
            .collect();
        assert!(codes.contains("anteater-1"));
        assert!(codes.contains("tarsier-1"));
        assert!(codes.contains("molerat-1"));
        assert!(results.success.contains_key("2.1.1"));
        assert!(results.success.contains_key("2.4.7"));
    }

    #[test]
    fn test_exclusions() {
        let parade = Parade::new().excluding(["Molerat", " tarsier "]).unwrap();
        let names: Vec<_> = parade.validators().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["anteater", "ayeaye", "glowworm"]);

        let doc = StyledDocument::parse_inline(PAGE);
        let results = parade.validate(&doc, &Config::default()).unwrap();
        assert!(!results.failures.contains_key("1.4.3"));
        assert!(!results.failures.contains_key("1.3.1"));
    }

    #[test]
    fn test_unknown_exclusion_is_rejected() {
        assert!(matches!(
            Parade::new().excluding(["hyena"]),
            Err(ZooError::UnknownValidator(_))
        ));
    }
}
