// SPDX-License-Identifier: PMPL-1.0-or-later
//! Parsed HTML documents with their styles resolved per element.
//!
//! A [`StyledDocument`] is built once per file and shared by every
//! validator that runs over it. Building one flattens the stylesheets,
//! merges each element's `style=` attribute on top and parses the result,
//! so validators never touch raw CSS.

pub mod encoding;
pub mod locator;

pub use locator::xpath;

use crate::config::Config;
use crate::error::{Result, ZooError};
use crate::style::inliner::{FlattenedStyles, Inliner, StylesheetInliner};
use crate::style::StyleDeclarations;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::debug;

/// Console snippets are cut to this many characters
const SNIPPET_LENGTH: usize = 70;

/// A parsed document and its per-element declarations
pub struct StyledDocument {
    html: Html,
    styles: HashMap<NodeId, StyleDeclarations>,
    pseudo_styles: HashMap<NodeId, Vec<(String, StyleDeclarations)>>,
}

impl std::fmt::Debug for StyledDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyledDocument")
            .field("styled_elements", &self.styles.len())
            .field("pseudo_styled_elements", &self.pseudo_styles.len())
            .finish()
    }
}

impl StyledDocument {
    /// Parse a document, flattening its stylesheets with `inliner`
    pub fn parse_with(source: &str, inliner: &dyn Inliner) -> Result<Self> {
        let html = Html::parse_document(source);
        let flattened = inliner.flatten(&html)?;
        Ok(Self::build(html, flattened))
    }

    /// Parse a document using only its inline `style=` attributes
    pub fn parse_inline(source: &str) -> Self {
        Self::build(Html::parse_document(source), FlattenedStyles::new())
    }

    /// Parse a document, resolving stylesheets against the configured static path
    pub fn load(source: &str, config: &Config) -> Result<Self> {
        Self::parse_with(source, &StylesheetInliner::from_config(config))
    }

    /// Decode raw bytes in their declared encoding and load them
    pub fn from_bytes(bytes: &[u8], config: &Config) -> Result<Self> {
        let source = encoding::decode(bytes)?;
        Self::load(&source, config)
    }

    fn build(html: Html, mut flattened: FlattenedStyles) -> Self {
        let mut styles = HashMap::new();
        let mut pseudo_styles = HashMap::new();

        for element in html.tree.root().descendants().filter_map(ElementRef::wrap) {
            let rules = flattened.remove(&element.id()).unwrap_or_default();

            let mut effective = rules.blocks.join(";");
            if let Some(inline) = element.value().attr("style") {
                effective.push(';');
                effective.push_str(inline);
            }

            let declarations = StyleDeclarations::parse(&effective);
            if !declarations.is_empty() {
                styles.insert(element.id(), declarations);
            }

            if !rules.pseudo_blocks.is_empty() {
                let parsed: Vec<_> = rules
                    .pseudo_blocks
                    .iter()
                    .map(|(pseudo, block)| (pseudo.clone(), StyleDeclarations::parse(block)))
                    .collect();
                pseudo_styles.insert(element.id(), parsed);
            }
        }

        debug!(
            "Resolved styles for {} elements ({} with pseudo-class rules)",
            styles.len(),
            pseudo_styles.len()
        );

        Self {
            html,
            styles,
            pseudo_styles,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Effective declarations of an element, if it has any
    pub fn declarations(&self, element: ElementRef<'_>) -> Option<&StyleDeclarations> {
        self.declarations_for(element.id())
    }

    pub(crate) fn declarations_for(&self, id: NodeId) -> Option<&StyleDeclarations> {
        self.styles.get(&id)
    }

    /// Declarations from rules like `a:focus { ... }` for the given pseudo-class
    pub fn pseudo_styles<'a>(
        &'a self,
        element: ElementRef<'_>,
        pseudo: &'a str,
    ) -> impl Iterator<Item = &'a StyleDeclarations> + 'a {
        self.pseudo_styles
            .get(&element.id())
            .into_iter()
            .flatten()
            .filter(move |(name, _)| name == pseudo)
            .map(|(_, declarations)| declarations)
    }

    /// Elements matching a CSS selector, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let compiled = Selector::parse(selector).map_err(|err| ZooError::Selector {
            selector: selector.to_string(),
            reason: err.to_string(),
        })?;
        Ok(self.html.select(&compiled).collect())
    }

    pub fn body(&self) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .child_elements()
            .find(|element| element.value().name() == "body")
    }
}

/// The text an element starts with, before its first child element
pub fn leading_text<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .children()
        .next()
        .and_then(|node| node.value().as_text())
        .map(|text| &**text)
}

/// Whether any direct text child of the element has visible content
pub fn has_own_text(element: ElementRef<'_>) -> bool {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .any(|text| !text.trim().is_empty())
}

/// Collapse whitespace and cut long text for console output
pub fn nice_console_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > SNIPPET_LENGTH {
        let cut: String = collapsed.chars().take(SNIPPET_LENGTH).collect();
        format!("{}...", cut)
    } else {
        collapsed
    }
}
