// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alt text validator - WCAG 1.1.1 Non-text Content (Level A)
//!
//! - Missing `alt` attribute: failure `anteater-1`
//! - `alt=""`: warning `anteater-2`, fine only for decorative images
//! - Anything else: success

use super::{ValidationContext, Validator};
use crate::error::Result;
use crate::results::Outcome;
use scraper::ElementRef;

const GUIDELINE: &str = "1.1.1";
const TECHNIQUE: &str = "H37";

/// Validator for image alt attributes
pub struct Anteater;

impl Validator for Anteater {
    fn name(&self) -> &'static str {
        "anteater"
    }

    fn description(&self) -> &'static str {
        "Checks <img> elements for alt attributes (WCAG 1.1.1)"
    }

    fn animal(&self) -> &'static str {
        "Anteaters eat ants and termites. They have long, sharp claws and a long,\n\
         sticky tongue. The tongue can be up to 60 cm long, as long as a person's\n\
         arm. The anteater opens an ant nest with its claws. Then it licks up the\n\
         ants with its tongue.\n\n\
         - https://simple.wikipedia.org/wiki/Anteater"
    }

    fn selector(&self) -> &'static str {
        "body img"
    }

    fn validate_element(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>) -> Result<()> {
        let outcome = Outcome::new(GUIDELINE, TECHNIQUE).at(element);
        let src = element.value().attr("src").unwrap_or("");

        match element.value().attr("alt") {
            None => {
                let message = format!(
                    "Missing alt tag on image for element - {}\n    Image was: {}",
                    outcome.xpath, src
                );
                ctx.results
                    .add_failure(outcome.with_error_code("anteater-1").with_message(message));
            }
            Some("") => {
                let message = format!(
                    "Blank alt tag on image for element - {}\n    Image was: {}\n    \
                     Only use blank alt tags when an image is purely decorative.",
                    outcome.xpath, src
                );
                ctx.results
                    .add_warning(outcome.with_error_code("anteater-2").with_message(message));
            }
            Some(_) => ctx.results.add_success(outcome),
        }

        Ok(())
    }
}
