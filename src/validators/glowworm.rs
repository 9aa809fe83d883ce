// SPDX-License-Identifier: PMPL-1.0-or-later
//! Focus outline validator - WCAG 2.4.7 Focus Visible (Level AA)
//!
//! Fails elements whose `:focus` styling removes the outline without
//! putting another visible indicator in its place.

use super::{ValidationContext, Validator};
use crate::error::Result;
use crate::results::Outcome;
use crate::style::StyleDeclarations;
use scraper::ElementRef;

const GUIDELINE: &str = "2.4.7";
const TECHNIQUE: &str = "G149";

/// Properties that can stand in for a removed outline
const REPLACEMENT_PROPERTIES: &[&str] = &["box-shadow", "border", "text-decoration", "background"];

/// Validator for suppressed focus outlines
pub struct Glowworm;

/// The inline form minifiers leave behind, e.g. `style=":focus{outline:none}"`
fn inline_focus_suppressed(style: &str) -> bool {
    let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
    compact.contains(":focus{outline:none}")
        || compact.starts_with("focus{outline:none}")
        || compact.contains(":focus{outline:0}")
}

/// Whether a `:focus` block hides the outline
fn removes_outline(declarations: &StyleDeclarations) -> bool {
    let is = |property: &str, values: &[&str]| {
        declarations
            .get(property)
            .map(|value| {
                let value = value.split('!').next().unwrap_or("").trim().to_lowercase();
                values.contains(&value.as_str())
            })
            .unwrap_or(false)
    };

    is("outline", &["none", "0", "0px"])
        || is("outline-style", &["none"])
        || is("outline-width", &["0", "0px"])
}

fn has_replacement(declarations: &StyleDeclarations) -> bool {
    declarations.iter().any(|(property, value)| {
        REPLACEMENT_PROPERTIES
            .iter()
            .any(|candidate| property.starts_with(candidate))
            && !matches!(value.trim().to_lowercase().as_str(), "none" | "0" | "")
    })
}

impl Validator for Glowworm {
    fn name(&self) -> &'static str {
        "glowworm"
    }

    fn description(&self) -> &'static str {
        "Checks for suppressed focus outlines (WCAG 2.4.7)"
    }

    fn animal(&self) -> &'static str {
        "A glow-worm, or glowworm, is an insect. Other names for glow-worms are\n\
         fire-fly and lightning bug. They are nocturnal, active during the night.\n\
         They have special organs that can produce light. This is used to find\n\
         mates. The patterns in which the beetles flash is unique per species.\n\n\
         - https://simple.wikipedia.org/wiki/Glow-worm"
    }

    fn selector(&self) -> &'static str {
        "body *"
    }

    fn skip_element(&self, element: ElementRef<'_>) -> Option<String> {
        match element.value().name() {
            "script" | "style" => Some(format!("<{}> elements are not rendered", element.value().name())),
            _ => None,
        }
    }

    fn validate_element(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>) -> Result<()> {
        let outcome = Outcome::new(GUIDELINE, TECHNIQUE).at(element);

        let inline = element
            .value()
            .attr("style")
            .map(inline_focus_suppressed)
            .unwrap_or(false);
        let from_stylesheet = ctx
            .document
            .pseudo_styles(element, "focus")
            .any(|focus| removes_outline(focus) && !has_replacement(focus));

        if inline || from_stylesheet {
            let message = format!(
                "Input or element has suppressed focus styling without alternate styling - {}",
                outcome.xpath
            );
            ctx.results
                .add_failure(outcome.with_error_code("glowworm-1").with_message(message));
        } else {
            ctx.results.add_success(outcome);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::StyledDocument;
    use crate::results::{OutcomeKind, ValidationResults};

    fn validate(html: &str) -> ValidationResults {
        let doc = StyledDocument::load(html, &Config::default()).unwrap();
        Glowworm.validate(&doc, &Config::default()).unwrap()
    }

    #[test]
    fn test_stylesheet_focus_outline_none_fails() {
        let results = validate(
            "<html><head><style>a:focus { outline: none }</style></head>\
             <body><a href=\"#\">x</a><p>y</p></body></html>",
        );
        let failures = results.outcomes(OutcomeKind::Failure);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].error_code.as_deref(), Some("glowworm-1"));
        assert_eq!(failures[0].xpath, "/html/body/a");
        assert_eq!(failures[0].guideline, "2.4.7");
        assert_eq!(results.count(OutcomeKind::Success), 1);
    }

    #[test]
    fn test_replacement_indicator_passes() {
        let results = validate(
            "<html><head><style>button:focus { outline: 0; box-shadow: 0 0 0 2px #005fcc }</style></head>\
             <body><button>Go</button></body></html>",
        );
        assert_eq!(results.failure_count(), 0);
        assert_eq!(results.count(OutcomeKind::Success), 1);
    }

    #[test]
    fn test_inline_minified_focus_rule_fails() {
        let results = validate(
            r#"<html><body><input style=":focus{outline:none}"></body></html>"#,
        );
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_hover_rule_is_not_focus() {
        let results = validate(
            "<html><head><style>a:hover { outline: none }</style></head>\
             <body><a href=\"#\">x</a></body></html>",
        );
        assert_eq!(results.failure_count(), 0);
    }

    #[test]
    fn test_script_is_skipped() {
        let results = validate("<html><body><script>var x;</script></body></html>");
        assert_eq!(results.count(OutcomeKind::Skipped), 1);
        assert_eq!(results.count(OutcomeKind::Success), 0);
    }

    #[test]
    fn test_outline_detection() {
        assert!(removes_outline(&StyleDeclarations::parse("outline: none !important")));
        assert!(removes_outline(&StyleDeclarations::parse("outline-width: 0")));
        assert!(!removes_outline(&StyleDeclarations::parse("outline: 2px solid blue")));
        assert!(!has_replacement(&StyleDeclarations::parse("outline: none; border: none")));
        assert!(has_replacement(&StyleDeclarations::parse("border-bottom: 2px solid")));
    }
}
