// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast evaluation - WCAG 1.4.3 Contrast (Minimum), 1.4.6 Contrast (Enhanced)
//!
//! Combines the pieces needed to judge one run of text:
//! - [`color`]: CSS color value parsing
//! - [`compositor`]: flattening translucent color stacks
//! - [`luminosity`]: relative luminance and contrast ratio
//! - [`font`]: rendered size and weight
//!
//! Required ratios:
//! - AA: 4.5:1 for normal text, 3:1 for large text
//! - AAA: 7:1 for normal text, 4.5:1 for large text

pub mod color;
pub mod compositor;
pub mod font;
pub mod luminosity;

pub use color::{Color, Rgb};
pub use compositor::{generate_opaque_color, ColorStack};
pub use font::FontMetrics;
pub use luminosity::{contrast_ratio, relative_luminance};

use crate::config::WcagLevel;
use crate::style::StyleDeclarations;
use serde::Serialize;

/// Default text color; recognisably not pure black when debugging
pub const DEFAULT_FOREGROUND: Color = Color::rgb(1, 2, 3);
/// Default page background; recognisably not pure white when debugging
pub const DEFAULT_BACKGROUND: Color = Color::rgb(254, 253, 252);

/// Conformance levels that set a contrast requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContrastLevel {
    AA,
    AAA,
}

impl ContrastLevel {
    /// Level A has no contrast requirement
    pub fn from_wcag(level: WcagLevel) -> Option<Self> {
        match level {
            WcagLevel::A => None,
            WcagLevel::AA => Some(ContrastLevel::AA),
            WcagLevel::AAA => Some(ContrastLevel::AAA),
        }
    }
}

/// Text size class as defined for WCAG contrast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Normal,
    Large,
}

impl SizeClass {
    /// Large text is at least 18pt, or at least 14pt and bold
    pub fn classify(metrics: &FontMetrics) -> Self {
        if metrics.size_pt >= 18.0 || (metrics.size_pt >= 14.0 && metrics.bold) {
            SizeClass::Large
        } else {
            SizeClass::Normal
        }
    }
}

impl std::fmt::Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeClass::Normal => write!(f, "normal"),
            SizeClass::Large => write!(f, "large"),
        }
    }
}

/// A required minimum ratio and the technique that defines it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    pub ratio: f64,
    pub technique: &'static str,
}

/// Look up the required ratio for a level and size class
pub fn threshold(level: ContrastLevel, size_class: SizeClass) -> Threshold {
    match (level, size_class) {
        (ContrastLevel::AA, SizeClass::Normal) => Threshold { ratio: 4.5, technique: "G18" },
        (ContrastLevel::AA, SizeClass::Large) => Threshold { ratio: 3.0, technique: "G145" },
        (ContrastLevel::AAA, SizeClass::Normal) => Threshold { ratio: 7.0, technique: "G17" },
        (ContrastLevel::AAA, SizeClass::Large) => Threshold { ratio: 4.5, technique: "G18" },
    }
}

/// Outcome of evaluating one text node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastResult {
    pub ratio: f64,
    pub threshold: f64,
    pub level: ContrastLevel,
    pub size_class: SizeClass,
    pub technique_code: &'static str,
    pub foreground: Rgb,
    pub background: Rgb,
    pub font: FontMetrics,
}

impl ContrastResult {
    pub fn passes(&self) -> bool {
        self.ratio >= self.threshold
    }
}

/// Evaluate contrast for resolved color stacks and font declarations
pub fn evaluate(
    foreground: &ColorStack,
    background: &ColorStack,
    fonts: &[StyleDeclarations],
    level: ContrastLevel,
) -> ContrastResult {
    let font = FontMetrics::resolve(fonts);
    let size_class = SizeClass::classify(&font);
    let required = threshold(level, size_class);
    let fg = foreground.flatten();
    let bg = background.flatten();

    ContrastResult {
        ratio: contrast_ratio(fg, bg),
        threshold: required.ratio,
        level,
        size_class,
        technique_code: required.technique,
        foreground: fg,
        background: bg,
        font,
    }
}
