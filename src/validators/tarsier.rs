// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading order validator - WCAG 1.3.1 Info and Relationships (Level A)
//!
//! Walks the headings in document order tracking the current depth. Staying
//! at the same depth, going one level deeper, or climbing back up any number
//! of levels is fine. Skipping a level fails, except before anything has
//! been seen, where a first heading other than H1 only warns.

use super::{run_validation_loop, ValidationContext, Validator};
use crate::document::{leading_text, nice_console_text};
use crate::error::{Result, ZooError};
use crate::results::Outcome;
use scraper::ElementRef;

const GUIDELINE: &str = "1.3.1";
const TECHNIQUE: &str = "H42";

/// Validator for heading sequence
pub struct Tarsier;

/// Level of an `h1`..`h6` element
fn heading_level(element: ElementRef<'_>) -> Result<u8> {
    let name = element.value().name();
    name.strip_prefix('h')
        .and_then(|level| level.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
        .ok_or_else(|| ZooError::UnexpectedElement(name.to_string()))
}

fn heading_text(element: ElementRef<'_>) -> String {
    nice_console_text(leading_text(element).unwrap_or(""))
}

impl Tarsier {
    fn check(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>, depth: &mut u8) -> Result<()> {
        let level = heading_level(element)?;
        let outcome = Outcome::new(GUIDELINE, TECHNIQUE).at(element);
        let current = *depth;

        if level <= current + 1 {
            ctx.results.add_success(outcome);
        } else if current == 0 {
            let message = format!(
                "{} header seen before the first H1. Text in header was {}",
                element.value().name(),
                heading_text(element)
            );
            ctx.results
                .add_warning(outcome.with_error_code("tarsier-2-warning").with_message(message));
        } else {
            let message = format!(
                "Incorrect header found at {} - H{} should be H{}, text in header was {}",
                outcome.xpath,
                level,
                current + 1,
                heading_text(element)
            );
            ctx.results
                .add_failure(outcome.with_error_code("tarsier-1").with_message(message));
        }

        *depth = level;
        Ok(())
    }
}

impl Validator for Tarsier {
    fn name(&self) -> &'static str {
        "tarsier"
    }

    fn description(&self) -> &'static str {
        "Checks that heading levels are not skipped (WCAG 1.3.1)"
    }

    fn animal(&self) -> &'static str {
        "The tarsiers are prosimian (non-monkey) primates. They got their name\n\
         from the long bones in their feet. Tarsiers have huge eyes and long feet,\n\
         and catch the insects by jumping at them. During the night they wait\n\
         quietly, listening for the sound of an insect moving nearby.\n\n\
         - https://simple.wikipedia.org/wiki/Tarsier"
    }

    fn selector(&self) -> &'static str {
        "body h1, body h2, body h3, body h4, body h5, body h6"
    }

    fn validate_element(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>) -> Result<()> {
        self.check(ctx, element, &mut 0)
    }

    fn validate_document(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let mut depth = 0u8;
        run_validation_loop(self, ctx, |ctx, element| self.check(ctx, element, &mut depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::StyledDocument;
    use crate::results::{OutcomeKind, ValidationResults};

    fn validate_with(html: &str, config: &Config) -> ValidationResults {
        let doc = StyledDocument::parse_inline(html);
        Tarsier.validate(&doc, config).unwrap()
    }

    fn validate(html: &str) -> ValidationResults {
        validate_with(html, &Config::default())
    }

    #[test]
    fn test_ordered_headings_pass() {
        let results = validate("<html><body><h1>a</h1><h2>b</h2><h3>c</h3></body></html>");
        assert_eq!(results.count(OutcomeKind::Success), 3);
        assert_eq!(results.failure_count(), 0);
        assert_eq!(results.warning_count(), 0);
    }

    #[test]
    fn test_first_heading_not_h1_warns() {
        let results = validate("<html><body><h2>Intro</h2><h1>Title</h1></body></html>");
        let warnings = results.outcomes(OutcomeKind::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].error_code.as_deref(), Some("tarsier-2-warning"));
        assert_eq!(
            warnings[0].message_text(),
            "h2 header seen before the first H1. Text in header was Intro"
        );
        assert_eq!(results.count(OutcomeKind::Success), 1);
        assert_eq!(results.success["1.3.1"]["H42"][0].xpath, "/html/body/h1");
    }

    #[test]
    fn test_skipped_level_fails() {
        let results = validate("<html><body><h1>Title</h1><h3>Deep</h3></body></html>");
        let failures = results.outcomes(OutcomeKind::Failure);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].error_code.as_deref(), Some("tarsier-1"));
        assert_eq!(
            failures[0].message_text(),
            "Incorrect header found at /html/body/h3 - H3 should be H2, text in header was Deep"
        );
    }

    #[test]
    fn test_heading_level_rejects_other_tags() {
        let doc = StyledDocument::parse_inline("<html><body><h3>x</h3><hr></body></html>");
        assert_eq!(heading_level(doc.select("h3").unwrap()[0]).unwrap(), 3);
        assert!(matches!(
            heading_level(doc.select("hr").unwrap()[0]),
            Err(ZooError::UnexpectedElement(_))
        ));
    }

    #[test]
    fn test_climbing_back_up_is_fine() {
        let results = validate(
            "<html><body><h1>a</h1><h2>b</h2><h3>c</h3><h4>d</h4><h2>e</h2><h3>f</h3></body></html>",
        );
        assert_eq!(results.count(OutcomeKind::Success), 6);
    }

    #[test]
    fn test_nested_headings_in_document_order() {
        let results = validate(
            "<html><body><section><h1>a</h1><div><h2>b</h2></div></section><h4>c</h4></body></html>",
        );
        assert_eq!(results.failure_count(), 1);
        assert!(results.outcomes(OutcomeKind::Failure)[0]
            .message_text()
            .contains("H4 should be H3"));
    }

    #[test]
    fn test_skipped_heading_does_not_move_depth() {
        let config = Config::default().skip_classes(["aside"]);
        let results = validate_with(
            r#"<html><body><h1>a</h1><h2 class="aside">b</h2><h2>c</h2></body></html>"#,
            &config,
        );
        assert_eq!(results.count(OutcomeKind::Success), 2);
        assert_eq!(results.count(OutcomeKind::Skipped), 1);
    }
}
