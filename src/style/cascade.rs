// SPDX-License-Identifier: PMPL-1.0-or-later
//! Ancestor-or-self style resolution.
//!
//! Each element's effective declarations are computed once when the
//! [`StyledDocument`] is built; resolving an element only walks its
//! ancestor chain and borrows from that cache.

use super::StyleDeclarations;
use crate::document::StyledDocument;
use scraper::ElementRef;

/// Declarations of an element and its ancestors, root first
pub type DeclarationStack<'a> = Vec<&'a StyleDeclarations>;

/// Every style that could influence `element`, in root-to-leaf order.
///
/// Elements without any effective style contribute no entry.
pub fn applicable_styles<'a>(
    document: &'a StyledDocument,
    element: ElementRef<'_>,
) -> DeclarationStack<'a> {
    let mut chain: Vec<_> = std::iter::once(element.id())
        .chain(element.ancestors().map(|node| node.id()))
        .collect();
    chain.reverse();

    chain
        .into_iter()
        .filter_map(|id| document.declarations_for(id))
        .collect()
}

/// The first hiding reason found along the ancestor-or-self chain
pub fn hidden_reason(stack: &[&StyleDeclarations]) -> Option<&'static str> {
    stack.iter().find_map(|declarations| declarations.hides_element())
}
