// SPDX-License-Identifier: PMPL-1.0-or-later
//! Style handling: declaration parsing, stylesheet flattening, and the
//! ancestor cascade consumed by the validators.

pub mod cascade;
pub mod declarations;
pub mod inliner;

pub use cascade::{applicable_styles, DeclarationStack};
pub use declarations::StyleDeclarations;
pub use inliner::{Inliner, StylesheetInliner};
