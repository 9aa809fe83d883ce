// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcag-zoo - WCAG 2.0 accessibility validators for HTML documents
//!
//! Each validator is named after an animal and checks one success
//! criterion against a parsed, styled document.
//!
//! ## Validators
//!
//! - **Anteater** (1.1.1): Images carry alt text
//! - **Ayeaye** (2.1.1): Access keys are present and unique
//! - **Glowworm** (2.4.7): Focus outlines are not suppressed
//! - **Molerat** (1.4.3/1.4.6): Text has enough color contrast
//! - **Tarsier** (1.3.1): Headings are nested in order
//! - **Parade**: all of the above at once
//!
//! ## Example
//!
//! ```no_run
//! use wcag_zoo::config::Config;
//! use wcag_zoo::document::StyledDocument;
//! use wcag_zoo::validators::{registry, Validator};
//!
//! let config = Config::default();
//! let doc = StyledDocument::load("<html><body><img src='a.png'></body></html>", &config)?;
//! let results = registry::lookup("anteater")?.validate(&doc, &config)?;
//! assert!(results.has_failures());
//! # Ok::<(), wcag_zoo::error::ZooError>(())
//! ```

pub mod config;
pub mod contrast;
pub mod document;
pub mod error;
pub mod report;
pub mod results;
pub mod scanner;
pub mod style;
pub mod validators;
