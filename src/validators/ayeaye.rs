// SPDX-License-Identifier: PMPL-1.0-or-later
//! Access key validator - WCAG 2.1.1 Keyboard (Level A)
//!
//! Access keys must be unique within a document. The first element using a
//! key wins; later ones fail and point back at it. A document with no
//! access keys at all gets a single warning on `<body>`.

use super::{run_validation_loop, ValidationContext, Validator};
use crate::error::Result;
use crate::results::Outcome;
use scraper::ElementRef;
use std::collections::HashMap;

const GUIDELINE: &str = "2.1.1";
const TECHNIQUE: &str = "G202";

/// Validator for `accesskey` uniqueness
pub struct Ayeaye;

impl Ayeaye {
    fn check(
        &self,
        ctx: &mut ValidationContext<'_>,
        element: ElementRef<'_>,
        found_keys: &mut HashMap<String, String>,
    ) {
        let outcome = Outcome::new(GUIDELINE, TECHNIQUE).at(element);
        let key = element.value().attr("accesskey").unwrap_or("").trim();

        if key.is_empty() {
            let message = format!("Blank `accesskey` attribute found at element {}", outcome.xpath);
            ctx.results
                .add_failure(outcome.with_error_code("ayeaye-2").with_message(message));
        } else if let Some(first) = found_keys.get(key) {
            let message = format!(
                "Duplicate `accesskey` attribute '{}' found. First seen at element {}",
                key, first
            );
            ctx.results
                .add_failure(outcome.with_error_code("ayeaye-1").with_message(message));
        } else {
            found_keys.insert(key.to_string(), outcome.xpath.clone());
            ctx.results.add_success(outcome);
        }
    }
}

impl Validator for Ayeaye {
    fn name(&self) -> &'static str {
        "ayeaye"
    }

    fn description(&self) -> &'static str {
        "Checks that accesskey attributes exist and are unique (WCAG 2.1.1)"
    }

    fn animal(&self) -> &'static str {
        "The aye-aye is a lemur which lives in rain forests of Madagascar, a large\n\
         island off the southeast coast of Africa. The aye-aye has rodent-like teeth\n\
         and a special thin middle finger to get at the insect grubs under tree bark.\n\n\
         - https://simple.wikipedia.org/wiki/Aye-aye"
    }

    fn selector(&self) -> &'static str {
        "body [accesskey]"
    }

    fn validate_element(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>) -> Result<()> {
        self.check(ctx, element, &mut HashMap::new());
        Ok(())
    }

    fn validate_document(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        let mut found_keys = HashMap::new();
        run_validation_loop(self, ctx, |ctx, element| {
            self.check(ctx, element, &mut found_keys);
            Ok(())
        })?;

        let document = ctx.document;
        if document.select(self.selector())?.is_empty() {
            if let Some(body) = document.body() {
                ctx.results.add_warning(
                    Outcome::new(GUIDELINE, TECHNIQUE)
                        .at(body)
                        .with_error_code("ayeaye-3-warning")
                        .with_message(
                            "No `accesskey` attributes found, consider adding some to improve keyboard accessibility",
                        ),
                );
            }
        }

        Ok(())
    }
}
