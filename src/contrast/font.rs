// SPDX-License-Identifier: PMPL-1.0-or-later
//! Approximate rendered font size and weight from a stack of font
//! declarations.
//!
//! Sizes are tracked in points starting from 10pt. `pt` values replace the
//! size, `px` values are converted at 0.75pt per px, and percentages scale
//! whatever size has accumulated so far, so nested percentages compound.

use crate::error::{Result, ZooError};
use crate::style::StyleDeclarations;
use serde::Serialize;
use tracing::debug;

/// Base size before any declaration applies
pub const DEFAULT_FONT_SIZE_PT: f64 = 10.0;

/// WCAG treats one CSS pixel as roughly three quarters of a point
const PT_PER_PX: f64 = 0.75;

/// Resolved font size and weight for one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontMetrics {
    pub size_pt: f64,
    pub bold: bool,
}

impl FontMetrics {
    /// Resolve metrics from an outermost-first font declaration stack
    pub fn resolve(stack: &[StyleDeclarations]) -> Self {
        Self {
            size_pt: calculate_font_size(stack),
            bold: is_font_bold(stack),
        }
    }

    pub fn weight_name(&self) -> &'static str {
        if self.bold {
            "bold"
        } else {
            "normal"
        }
    }
}

/// The declarations that seed every font stack
pub fn default_font_declarations() -> StyleDeclarations {
    let mut defaults = StyleDeclarations::new();
    defaults.insert("font-size", "10pt");
    defaults.insert("font-weight", "normal");
    defaults
}

/// Calculate the approximate rendered font size in points (not pixels)
pub fn calculate_font_size(stack: &[StyleDeclarations]) -> f64 {
    let mut font_size = DEFAULT_FONT_SIZE_PT;

    for declarations in stack {
        let size = match declarations.get("font-size") {
            Some(size) if !size.trim().is_empty() => size,
            _ => match declarations.get("font") {
                Some(shorthand) => match shorthand_size_token(shorthand) {
                    Some(token) => token,
                    None => continue,
                },
                None => continue,
            },
        };

        match apply_font_size(size, font_size) {
            Ok(resolved) => font_size = resolved,
            Err(err) => debug!("{}, ignoring declaration", err),
        }
    }

    font_size
}

/// Apply one size value on top of the accumulated size
pub fn apply_font_size(value: &str, current_pt: f64) -> Result<f64> {
    let value = value.split('!').next().unwrap_or("").trim().to_lowercase();
    let unsupported = || ZooError::UnsupportedFontUnit(value.clone());

    if let Some(number) = value.strip_suffix("pt") {
        return number.trim().parse::<f64>().map_err(|_| unsupported());
    }
    if let Some(number) = value.strip_suffix("px") {
        return number
            .trim()
            .parse::<f64>()
            .map(|px| px * PT_PER_PX)
            .map_err(|_| unsupported());
    }
    if let Some(number) = value.strip_suffix('%') {
        return number
            .trim()
            .parse::<f64>()
            .map(|percent| current_pt * percent / 100.0)
            .map_err(|_| unsupported());
    }
    // em, rem and keyword sizes are not resolved
    Err(unsupported())
}

/// Pull the size out of a `font` shorthand, e.g. `bold 12px/1.4 serif`
fn shorthand_size_token(shorthand: &str) -> Option<&str> {
    let tokens: Vec<&str> = shorthand
        .split_whitespace()
        .map(|token| token.split('/').next().unwrap_or(token))
        .collect();

    let has_unit = |token: &str, units: &[&str]| {
        units.iter().any(|unit| {
            token
                .strip_suffix(unit)
                .map(|n| !n.is_empty() && n.parse::<f64>().is_ok())
                .unwrap_or(false)
        })
    };

    tokens
        .iter()
        .copied()
        .find(|token| has_unit(*token, &["pt", "px", "%"]))
        .or_else(|| {
            tokens
                .iter()
                .copied()
                .find(|token| has_unit(*token, &["em", "rem", "ex", "ch"]))
        })
}

/// Determine whether the text is bold.
///
/// The first declaration that mentions `bold`, or whose `font-weight` is
/// numeric, decides; later declarations are not consulted.
pub fn is_font_bold(stack: &[StyleDeclarations]) -> bool {
    for declarations in stack {
        let weight = declarations
            .get("font-weight")
            .map(|w| w.trim().to_lowercase())
            .unwrap_or_default();
        let shorthand = declarations
            .get("font")
            .map(|f| f.to_lowercase())
            .unwrap_or_default();

        if weight.contains("bold") || shorthand.contains("bold") {
            return true;
        }
        if let Ok(numeric) = weight.parse::<u32>() {
            return numeric > 500;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: &[(&str, &str)]) -> StyleDeclarations {
        let mut d = StyleDeclarations::new();
        for (k, v) in pairs {
            d.insert(k, v);
        }
        d
    }

    fn stack(entries: &[&[(&str, &str)]]) -> Vec<StyleDeclarations> {
        let mut s = vec![default_font_declarations()];
        s.extend(entries.iter().map(|e| decls(e)));
        s
    }

    #[test]
    fn test_default_size() {
        assert_eq!(calculate_font_size(&stack(&[])), 10.0);
        assert!(!is_font_bold(&stack(&[])));
    }

    #[test]
    fn test_units() {
        assert_eq!(calculate_font_size(&stack(&[&[("font-size", "18pt")]])), 18.0);
        assert_eq!(calculate_font_size(&stack(&[&[("font-size", "24px")]])), 18.0);
        assert_eq!(calculate_font_size(&stack(&[&[("font-size", "150%")]])), 15.0);
        assert_eq!(calculate_font_size(&stack(&[&[("font-size", "12.5pt")]])), 12.5);
    }

    #[test]
    fn test_percentages_compound() {
        let s = stack(&[&[("font-size", "200%")], &[], &[("font-size", "150%")]]);
        assert_eq!(calculate_font_size(&s), 30.0);
    }

    #[test]
    fn test_last_size_wins() {
        let s = stack(&[&[("font-size", "30pt")], &[("font-size", "12px")]]);
        assert_eq!(calculate_font_size(&s), 9.0);
    }

    #[test]
    fn test_unsupported_units_contribute_nothing() {
        let s = stack(&[&[("font-size", "20pt")], &[("font-size", "2em")], &[("font-size", "large")]]);
        assert_eq!(calculate_font_size(&s), 20.0);
        assert!(matches!(
            apply_font_size("1.5rem", 10.0),
            Err(ZooError::UnsupportedFontUnit(_))
        ));
    }

    #[test]
    fn test_shorthand_size() {
        let s = stack(&[&[("font", "bold 24px/1.5 Georgia, serif")]]);
        assert_eq!(calculate_font_size(&s), 18.0);
        let s = stack(&[&[("font", "italic 2em serif")]]);
        assert_eq!(calculate_font_size(&s), 10.0);
        let s = stack(&[&[("font", "menu")]]);
        assert_eq!(calculate_font_size(&s), 10.0);
    }

    #[test]
    fn test_font_size_preferred_over_shorthand() {
        let s = stack(&[&[("font", "20pt serif"), ("font-size", "8pt")]]);
        assert_eq!(calculate_font_size(&s), 8.0);
    }

    #[test]
    fn test_bold_keywords() {
        assert!(is_font_bold(&stack(&[&[("font-weight", "bold")]])));
        assert!(is_font_bold(&stack(&[&[("font-weight", "bolder")]])));
        assert!(is_font_bold(&stack(&[&[("font", "bold 12pt serif")]])));
    }

    #[test]
    fn test_bold_numeric() {
        assert!(is_font_bold(&stack(&[&[("font-weight", "700")]])));
        assert!(!is_font_bold(&stack(&[&[("font-weight", "500")]])));
    }

    #[test]
    fn test_bold_first_match_wins() {
        // An outer numeric weight decides even though an inner rule says bold
        let s = stack(&[&[("font-weight", "400")], &[("font-weight", "bold")]]);
        assert!(!is_font_bold(&s));
        let s = stack(&[&[("font-weight", "bold")], &[("font-weight", "100")]]);
        assert!(is_font_bold(&s));
    }

    #[test]
    fn test_resolve_metrics() {
        let metrics = FontMetrics::resolve(&stack(&[&[("font-size", "14pt"), ("font-weight", "600")]]));
        assert_eq!(metrics.size_pt, 14.0);
        assert!(metrics.bold);
        assert_eq!(metrics.weight_name(), "bold");
    }
}
