// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast validator - WCAG 1.4.3 Contrast (Minimum), 1.4.6 Contrast (Enhanced)
//!
//! For every element with leading text, the foreground and background
//! colors declared along its ancestor chain are composited down to opaque
//! colors and compared against the ratio required for its font size.
//!
//! Background images are not considered, so a pass here is not proof of
//! conformance and a failure may be a false alarm over an image.

use super::{ValidationContext, Validator};
use crate::config::WcagLevel;
use crate::contrast::font::default_font_declarations;
use crate::contrast::{
    evaluate, threshold, Color, ColorStack, ContrastLevel, ContrastResult, SizeClass,
    DEFAULT_BACKGROUND, DEFAULT_FOREGROUND,
};
use crate::document::{has_own_text, leading_text, nice_console_text};
use crate::error::{Result, ZooError};
use crate::results::Outcome;
use crate::style::{applicable_styles, StyleDeclarations};
use colored::Colorize;
use scraper::ElementRef;

const GUIDELINE: &str = "1.4.3";

/// Validator for text color contrast
pub struct Molerat;

/// Color, background and font stacks for one element
struct ResolvedStacks {
    colors: ColorStack,
    backgrounds: ColorStack,
    fonts: Vec<StyleDeclarations>,
}

fn resolve_stacks(cascade: &[&StyleDeclarations]) -> ResolvedStacks {
    let mut stacks = ResolvedStacks {
        colors: ColorStack::seeded(DEFAULT_FOREGROUND),
        backgrounds: ColorStack::seeded(DEFAULT_BACKGROUND),
        fonts: vec![default_font_declarations()],
    };

    for declarations in cascade {
        if let Some(color) = declarations.get("color") {
            stacks.colors.push(Color::parse_or_black(color));
        }
        if let Some(background) = declarations.get("background-color") {
            stacks.backgrounds.push(Color::parse_or_black(background));
        }
        stacks.fonts.push(declarations.font_declarations());
    }

    stacks
}

fn hint(result: &ContrastResult) -> &'static str {
    let normal_threshold = threshold(result.level, SizeClass::Normal).ratio;
    if result.ratio < normal_threshold {
        "Increase the contrast of this text to fix this error"
    } else if result.size_class == SizeClass::Normal {
        "Increase the contrast, size or font-weight of the text to fix this error"
    } else if result.font.bold {
        "Increase the contrast or size of the text to fix this error"
    } else {
        "Increase the contrast or font-weight of the text to fix this error"
    }
}

fn failure_message(result: &ContrastResult, xpath: &str, text: &str, verbosity: u8) -> String {
    let headline = match result.size_class {
        SizeClass::Normal => format!(
            "Insufficient contrast ({:.2}) for text at element - {}",
            result.ratio, xpath
        ),
        SizeClass::Large => format!(
            "Insufficient contrast ({:.2}) for large text element at element - {}",
            result.ratio, xpath
        ),
    };

    let mut lines = vec![
        headline,
        format!(
            "Computed rgb values are == Foreground {} / Background {}",
            result.foreground, result.background
        ),
        format!("Text was:         {}", text),
    ];

    if verbosity > 1 {
        let (fg, bg) = (result.foreground, result.background);
        lines.push(format!(
            "Colored text was: {}",
            text.truecolor(fg.r, fg.g, fg.b).on_truecolor(bg.r, bg.g, bg.b)
        ));
    }

    lines.push(format!(
        "Computed font-size was: {} {} ({})",
        result.font.size_pt,
        result.font.weight_name(),
        result.size_class
    ));

    if verbosity > 2 {
        lines.push(format!("Hint: {}", hint(result)));
    }

    lines.join("\n    ")
}

impl Validator for Molerat {
    fn name(&self) -> &'static str {
        "molerat"
    }

    fn description(&self) -> &'static str {
        "Checks text color contrast against its background (WCAG 1.4.3, 1.4.6)"
    }

    fn animal(&self) -> &'static str {
        "The naked mole rat, (or sand puppy) is a burrowing rodent. The species is\n\
         native to parts of East Africa. It is one of only two known eusocial mammals.\n\n\
         The animal has unusual features, adapted to its harsh underground environment.\n\
         The animals do not feel pain in their skin. They also have a very low metabolism.\n\n\
         - https://simple.wikipedia.org/wiki/Naked_mole_rat"
    }

    fn selector(&self) -> &'static str {
        "body *"
    }

    fn applies_to_level(&self, level: WcagLevel) -> bool {
        ContrastLevel::from_wcag(level).is_some()
    }

    fn matches(&self, element: ElementRef<'_>) -> bool {
        has_own_text(element)
    }

    fn skip_element(&self, element: ElementRef<'_>) -> Option<String> {
        let name = element.value().name();
        if matches!(name, "script" | "style") {
            return Some(format!("<{}> elements are not rendered", name));
        }
        match leading_text(element) {
            Some(text) if !text.trim().is_empty() => None,
            _ => Some("element text does not start before its first child".to_string()),
        }
    }

    fn validate_element(&self, ctx: &mut ValidationContext<'_>, element: ElementRef<'_>) -> Result<()> {
        let level = ContrastLevel::from_wcag(ctx.config.level).ok_or_else(|| {
            ZooError::Contrast(format!("no contrast requirement at level {}", ctx.config.level))
        })?;

        let cascade = applicable_styles(ctx.document, element);
        let stacks = resolve_stacks(&cascade);
        let result = evaluate(&stacks.colors, &stacks.backgrounds, &stacks.fonts, level);
        let outcome = Outcome::new(GUIDELINE, result.technique_code).at(element);

        if result.passes() {
            ctx.results.add_success(outcome);
            return Ok(());
        }

        let error_code = match result.size_class {
            SizeClass::Normal => "molerat-1",
            SizeClass::Large => "molerat-2",
        };
        let text = nice_console_text(leading_text(element).unwrap_or(""));
        let message = failure_message(&result, &outcome.xpath, &text, ctx.config.verbosity);
        ctx.results
            .add_failure(outcome.with_error_code(error_code).with_message(message));

        Ok(())
    }
}
