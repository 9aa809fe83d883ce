// SPDX-License-Identifier: PMPL-1.0-or-later
//! Validation outcomes and the per-run accumulator.
//!
//! Outcomes are grouped guideline -> technique -> list, so a report can show
//! e.g. every `1.4.3 / G18` failure together.

use crate::document::xpath;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Guideline and technique used for skipped elements
pub const SKIPPED: &str = "skipped";

/// One validator verdict about one element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// WCAG success criterion, e.g. `1.4.3`
    pub guideline: String,
    /// WCAG technique, e.g. `G18`
    pub technique: String,
    /// Validator-specific code, e.g. `molerat-1`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub xpath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The element's `class` attribute
    pub classes: Option<String>,
    /// The element's `id` attribute
    pub id: Option<String>,
}

impl Outcome {
    pub fn new(guideline: &str, technique: &str) -> Self {
        Self {
            guideline: guideline.to_string(),
            technique: technique.to_string(),
            ..Self::default()
        }
    }

    /// Locate the outcome at an element
    pub fn at(mut self, element: ElementRef<'_>) -> Self {
        self.xpath = xpath(element);
        self.classes = element.value().attr("class").map(str::to_string);
        self.id = element.value().attr("id").map(str::to_string);
        self
    }

    pub fn with_error_code(mut self, code: &str) -> Self {
        self.error_code = Some(code.to_string());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Message text, or an empty string
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    /// Whether the element carries the given class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes
            .as_deref()
            .map(|c| c.split_whitespace().any(|name| name == class))
            .unwrap_or(false)
    }
}

/// Outcomes grouped by guideline, then technique
pub type Grouped = BTreeMap<String, BTreeMap<String, Vec<Outcome>>>;

/// The four outcome kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Failure,
    Warning,
    Skipped,
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeKind::Success => write!(f, "SUCCESS"),
            OutcomeKind::Failure => write!(f, "ERROR"),
            OutcomeKind::Warning => write!(f, "WARNING"),
            OutcomeKind::Skipped => write!(f, "Skipped"),
        }
    }
}

/// Everything one validation run produced for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResults {
    pub success: Grouped,
    pub failures: Grouped,
    pub warnings: Grouped,
    pub skipped: Grouped,
}

/// Flat lists of outcomes, as emitted by `--flat-json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatResults {
    pub failures: Vec<Outcome>,
    pub warnings: Vec<Outcome>,
    pub skipped: Vec<Outcome>,
    pub success: Vec<Outcome>,
}

fn insert(group: &mut Grouped, outcome: Outcome) {
    group
        .entry(outcome.guideline.clone())
        .or_default()
        .entry(outcome.technique.clone())
        .or_default()
        .push(outcome);
}

fn flatten(group: &Grouped) -> impl Iterator<Item = &Outcome> {
    group.values().flat_map(|techniques| techniques.values()).flatten()
}

fn merge_group(into: &mut Grouped, from: Grouped) {
    for (guideline, techniques) in from {
        let target = into.entry(guideline).or_default();
        for (technique, outcomes) in techniques {
            target.entry(technique).or_default().extend(outcomes);
        }
    }
}

impl ValidationResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: OutcomeKind, outcome: Outcome) {
        let group = match kind {
            OutcomeKind::Success => &mut self.success,
            OutcomeKind::Failure => &mut self.failures,
            OutcomeKind::Warning => &mut self.warnings,
            OutcomeKind::Skipped => &mut self.skipped,
        };
        insert(group, outcome);
    }

    pub fn add_success(&mut self, outcome: Outcome) {
        self.add(OutcomeKind::Success, outcome);
    }

    pub fn add_failure(&mut self, outcome: Outcome) {
        self.add(OutcomeKind::Failure, outcome);
    }

    pub fn add_warning(&mut self, outcome: Outcome) {
        self.add(OutcomeKind::Warning, outcome);
    }

    pub fn add_skipped(&mut self, outcome: Outcome) {
        self.add(OutcomeKind::Skipped, outcome);
    }

    /// Fold another run's outcomes into this one, keeping both
    pub fn merge(&mut self, other: ValidationResults) {
        merge_group(&mut self.success, other.success);
        merge_group(&mut self.failures, other.failures);
        merge_group(&mut self.warnings, other.warnings);
        merge_group(&mut self.skipped, other.skipped);
    }

    pub fn group(&self, kind: OutcomeKind) -> &Grouped {
        match kind {
            OutcomeKind::Success => &self.success,
            OutcomeKind::Failure => &self.failures,
            OutcomeKind::Warning => &self.warnings,
            OutcomeKind::Skipped => &self.skipped,
        }
    }

    /// All outcomes of one kind, in guideline/technique order
    pub fn outcomes(&self, kind: OutcomeKind) -> Vec<&Outcome> {
        flatten(self.group(kind)).collect()
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        flatten(self.group(kind)).count()
    }

    pub fn failure_count(&self) -> usize {
        self.count(OutcomeKind::Failure)
    }

    pub fn warning_count(&self) -> usize {
        self.count(OutcomeKind::Warning)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn flat(&self) -> FlatResults {
        let owned = |kind| self.outcomes(kind).into_iter().cloned().collect();
        FlatResults {
            failures: owned(OutcomeKind::Failure),
            warnings: owned(OutcomeKind::Warning),
            skipped: owned(OutcomeKind::Skipped),
            success: owned(OutcomeKind::Success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(guideline: &str, technique: &str, code: &str) -> Outcome {
        Outcome::new(guideline, technique).with_error_code(code)
    }

    #[test]
    fn test_grouping() {
        let mut results = ValidationResults::new();
        results.add_failure(outcome("1.4.3", "G18", "molerat-1"));
        results.add_failure(outcome("1.4.3", "G18", "molerat-1"));
        results.add_failure(outcome("1.4.3", "G145", "molerat-2"));
        results.add_warning(outcome("1.1.1", "H37", "anteater-2"));

        assert_eq!(results.failures["1.4.3"]["G18"].len(), 2);
        assert_eq!(results.failures["1.4.3"]["G145"].len(), 1);
        assert_eq!(results.failure_count(), 3);
        assert_eq!(results.warning_count(), 1);
        assert!(results.has_failures());
        assert!(results.success.is_empty());
    }

    #[test]
    fn test_merge_keeps_both_sides() {
        let mut left = ValidationResults::new();
        left.add_success(outcome("1.1.1", "H37", "a"));
        let mut right = ValidationResults::new();
        right.add_success(outcome("1.1.1", "H37", "b"));
        right.add_success(outcome("1.3.1", "H42", "c"));

        left.merge(right);
        assert_eq!(left.success["1.1.1"]["H37"].len(), 2);
        assert_eq!(left.count(OutcomeKind::Success), 3);
    }

    #[test]
    fn test_flat_is_concatenation() {
        let mut results = ValidationResults::new();
        results.add_failure(outcome("2.1.1", "G202", "ayeaye-1"));
        results.add_failure(outcome("1.1.1", "H37", "anteater-1"));
        results.add_skipped(Outcome::new(SKIPPED, SKIPPED));

        let flat = results.flat();
        let codes: Vec<_> = flat
            .failures
            .iter()
            .filter_map(|o| o.error_code.as_deref())
            .collect();
        assert_eq!(codes, vec!["anteater-1", "ayeaye-1"]);
        assert_eq!(flat.skipped.len(), 1);
        assert!(flat.success.is_empty());
    }

    #[test]
    fn test_outcome_at_element() {
        let html = scraper::Html::parse_document(
            r#"<html><body><img id="logo" class="brand wide" src="x.png"></body></html>"#,
        );
        let selector = scraper::Selector::parse("img").unwrap();
        let img = html.select(&selector).next().unwrap();
        let located = Outcome::new("1.1.1", "H37").at(img);

        assert_eq!(located.xpath, "/html/body/img");
        assert_eq!(located.id.as_deref(), Some("logo"));
        assert!(located.has_class("wide"));
        assert!(!located.has_class("bran"));
    }

    #[test]
    fn test_serializes_grouped_shape() {
        let mut results = ValidationResults::new();
        results.add_warning(outcome("1.3.1", "H42", "tarsier-2-warning"));
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(
            json["warnings"]["1.3.1"]["H42"][0]["error_code"],
            "tarsier-2-warning"
        );
        assert!(json["failures"].as_object().unwrap().is_empty());
    }
}
