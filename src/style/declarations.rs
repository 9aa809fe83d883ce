// SPDX-License-Identifier: PMPL-1.0-or-later
//! Parsing of `style=` attribute strings into property/value pairs.

use crate::error::{Result, ZooError};
use serde::Serialize;
use tracing::debug;

/// One element's declarations in source order.
///
/// Lookups return the last value declared for a property, matching how a
/// later declaration in the same block overrides an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleDeclarations {
    entries: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration block such as `color: red; font-size: 12pt`.
    ///
    /// Declarations without a colon are skipped; the rest still apply.
    pub fn parse(style: &str) -> Self {
        let mut declarations = Self::new();
        for segment in style.split(';') {
            match parse_declaration(segment) {
                Ok(Some((property, value))) => declarations.insert(&property, &value),
                Ok(None) => {}
                Err(err) => debug!("{}, skipping", err),
            }
        }
        declarations
    }

    /// Append a declaration; the property name is normalised to lowercase
    pub fn insert(&mut self, property: &str, value: &str) {
        self.entries
            .push((property.trim().to_lowercase(), value.trim().to_string()));
    }

    /// The effective value of a property
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declarations whose property name mentions `font`
    pub fn font_declarations(&self) -> StyleDeclarations {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(name, _)| name.contains("font"))
                .cloned()
                .collect(),
        }
    }

    /// Whether these declarations hide the element
    pub fn hides_element(&self) -> Option<&'static str> {
        if self
            .get("display")
            .map(|v| v.to_lowercase() == "none")
            .unwrap_or(false)
        {
            return Some("display is none");
        }
        if self
            .get("visibility")
            .map(|v| v.to_lowercase() == "hidden")
            .unwrap_or(false)
        {
            return Some("visibility is hidden");
        }
        None
    }
}

/// Split one `property: value` segment at its first colon.
///
/// Blank segments (e.g. after a trailing `;`) yield `Ok(None)`.
pub fn parse_declaration(segment: &str) -> Result<Option<(String, String)>> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Ok(None);
    }
    match segment.split_once(':') {
        Some((property, value)) if !property.trim().is_empty() => {
            Ok(Some((property.trim().to_lowercase(), value.trim().to_string())))
        }
        _ => Err(ZooError::MalformedStyleDeclaration(segment.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block() {
        let d = StyleDeclarations::parse("color: red; Background-Color:#fff ; font-size: 12pt;");
        assert_eq!(d.len(), 3);
        assert_eq!(d.get("color"), Some("red"));
        assert_eq!(d.get("background-color"), Some("#fff"));
        assert_eq!(d.get("font-size"), Some("12pt"));
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let d = StyleDeclarations::parse("background: url(http://example.com/a.png)");
        assert_eq!(d.get("background"), Some("url(http://example.com/a.png)"));
    }

    #[test]
    fn test_malformed_declaration_is_skipped() {
        let d = StyleDeclarations::parse("color: navy; nonsense; : empty; font-weight: bold");
        assert_eq!(d.len(), 2);
        assert_eq!(d.get("color"), Some("navy"));
        assert_eq!(d.get("font-weight"), Some("bold"));
        assert!(matches!(
            parse_declaration("nonsense"),
            Err(ZooError::MalformedStyleDeclaration(_))
        ));
        assert!(parse_declaration("   ").unwrap().is_none());
    }

    #[test]
    fn test_later_declaration_wins() {
        let d = StyleDeclarations::parse("color: red; color: blue");
        assert_eq!(d.get("color"), Some("blue"));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_font_declarations_subset() {
        let d = StyleDeclarations::parse("color: red; font-size: 12pt; font: bold 1em serif");
        let fonts = d.font_declarations();
        assert_eq!(fonts.len(), 2);
        assert!(!fonts.contains("color"));
    }

    #[test]
    fn test_hides_element() {
        assert_eq!(
            StyleDeclarations::parse("display: NONE").hides_element(),
            Some("display is none")
        );
        assert_eq!(
            StyleDeclarations::parse("visibility: hidden").hides_element(),
            Some("visibility is hidden")
        );
        assert_eq!(StyleDeclarations::parse("display: block").hides_element(), None);
    }
}
