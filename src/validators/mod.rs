// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG 2.0 validators.
//!
//! Each validator visits the elements matched by its CSS selector and
//! records one outcome per element. The shared loop in
//! [`run_validation_loop`] handles skipping and contains per-element
//! errors, so a bad element never stops the rest of the document.

pub mod anteater;
pub mod ayeaye;
pub mod glowworm;
pub mod molerat;
pub mod parade;
pub mod registry;
pub mod tarsier;

use crate::config::{Config, WcagLevel};
use crate::document::{leading_text, xpath, StyledDocument};
use crate::error::Result;
use crate::results::{Outcome, ValidationResults, SKIPPED};
use crate::style::cascade::{applicable_styles, hidden_reason};
use scraper::ElementRef;
use tracing::{debug, warn};

/// State of one validation run over one document
pub struct ValidationContext<'a> {
    pub document: &'a StyledDocument,
    pub config: &'a Config,
    pub results: ValidationResults,
}

impl<'a> ValidationContext<'a> {
    pub fn new(document: &'a StyledDocument, config: &'a Config) -> Self {
        Self {
            document,
            config,
            results: ValidationResults::new(),
        }
    }
}

/// Trait implemented by all validators
pub trait Validator: Send + Sync {
    /// Command name, e.g. `molerat`
    fn name(&self) -> &'static str;

    /// Short description of what this validator checks
    fn description(&self) -> &'static str;

    /// A few lines about the animal the validator is named after
    fn animal(&self) -> &'static str;

    /// CSS selector for the elements to visit
    fn selector(&self) -> &'static str;

    /// Check if this validator applies to the given WCAG level
    fn applies_to_level(&self, _level: WcagLevel) -> bool {
        true
    }

    /// Extra filter on selector matches, for conditions a CSS selector
    /// can't express. Elements rejected here leave no outcome at all.
    fn matches(&self, _element: ElementRef<'_>) -> bool {
        true
    }

    /// Validator-specific reason to skip an element
    fn skip_element(&self, _element: ElementRef<'_>) -> Option<String> {
        None
    }

    /// Validate one element, recording outcomes in `ctx`
    fn validate_element(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>)
        -> Result<()>;

    /// Validate the whole document; override for document-level checks
    fn validate_document(&self, ctx: &mut ValidationContext<'_>) -> Result<()> {
        run_validation_loop(self, ctx, |ctx, element| self.validate_element(ctx, element))
    }

    /// Run against a document with a fresh accumulator
    fn validate(&self, document: &StyledDocument, config: &Config) -> Result<ValidationResults> {
        let mut ctx = ValidationContext::new(document, config);
        if !self.applies_to_level(config.level) {
            debug!("{} does not apply at level {}", self.name(), config.level);
            return Ok(ctx.results);
        }
        self.validate_document(&mut ctx)?;
        Ok(ctx.results)
    }
}

/// What a command runs: one validator, or the whole parade
pub enum Suite {
    Single(Box<dyn Validator>),
    Parade(parade::Parade),
}

impl Suite {
    pub fn name(&self) -> &'static str {
        match self {
            Suite::Single(validator) => validator.name(),
            Suite::Parade(_) => "parade",
        }
    }

    pub fn animal(&self) -> &'static str {
        match self {
            Suite::Single(validator) => validator.animal(),
            Suite::Parade(_) => parade::ANIMAL,
        }
    }

    pub fn validate(&self, document: &StyledDocument, config: &Config) -> Result<ValidationResults> {
        match self {
            Suite::Single(validator) => validator.validate(document, config),
            Suite::Parade(parade) => parade.validate(document, config),
        }
    }
}

/// Visit every non-skipped element matching the validator's selector.
///
/// An `Err` from `visit` is logged and the element recorded as skipped.
pub fn run_validation_loop<'a, V, F>(
    validator: &V,
    ctx: &mut ValidationContext<'a>,
    mut visit: F,
) -> Result<()>
where
    V: Validator + ?Sized,
    F: FnMut(&mut ValidationContext<'a>, ElementRef<'a>) -> Result<()>,
{
    let document = ctx.document;
    for element in document.select(validator.selector())? {
        if !validator.matches(element) {
            continue;
        }
        if check_skip_element(validator, ctx, element) {
            continue;
        }
        if let Err(err) = visit(&mut *ctx, element) {
            let path = xpath(element);
            warn!("{}: could not validate {}: {}", validator.name(), path, err);
            ctx.results.add_skipped(
                Outcome::new(SKIPPED, SKIPPED)
                    .at(element)
                    .with_message(format!("Skipped [{}] because validation failed: {}", path, err)),
            );
        }
    }
    Ok(())
}

/// Record a skipped outcome and return true if the element must not be
/// validated: a skipped class or id, the validator's own rule, or (with
/// `ignore_hidden`) a hiding style on the element or an ancestor.
pub fn check_skip_element<V>(
    validator: &V,
    ctx: &mut ValidationContext<'_>,
    element: ElementRef<'_>,
) -> bool
where
    V: Validator + ?Sized,
{
    let config = ctx.config;
    let mut reasons = Vec::new();
    let mut skip = false;
    let path = xpath(element);
    let text = leading_text(element).unwrap_or("").trim();

    for class in element.value().classes() {
        if config.skip_classes.contains(class) {
            reasons.push(format!(
                "Skipped [{}] because node matches class [{}]\n    Text was: [{}]",
                path, class, text
            ));
            skip = true;
        }
    }

    if let Some(id) = element.value().id() {
        if config.skip_ids.contains(id) {
            reasons.push(format!(
                "Skipped [{}] because node id is [{}]\n    Text was: [{}]",
                path, id, text
            ));
            skip = true;
        }
    }

    if let Some(reason) = validator.skip_element(element) {
        reasons.push(format!("Skipped [{}] because {}", path, reason));
        skip = true;
    }

    if config.ignore_hidden {
        let stack = applicable_styles(ctx.document, element);
        if let Some(reason) = hidden_reason(&stack) {
            reasons.push(format!(
                "Skipped [{}] because {}\n    Text was: [{}]",
                path, reason, text
            ));
            skip = true;
        }
    }

    if skip {
        ctx.results.add_skipped(
            Outcome::new(SKIPPED, SKIPPED)
                .at(element)
                .with_message(reasons.join("\n    ")),
        );
    }
    skip
}
