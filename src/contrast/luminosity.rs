// SPDX-License-Identifier: PMPL-1.0-or-later
//! Relative luminance and contrast ratio per WCAG 2.0.
//! <https://www.w3.org/TR/WCAG20-TECHS/G17.html#G17-tests>

use super::color::Rgb;

/// Linearise one sRGB channel
fn linear_channel(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c < 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Calculate relative luminance of an opaque color
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linear_channel(color.r)
        + 0.7152 * linear_channel(color.g)
        + 0.0722 * linear_channel(color.b)
}

/// Calculate contrast ratio between two colors
/// Returns a ratio >= 1.0 (e.g., 4.5, 7.0, 21.0)
pub fn contrast_ratio(foreground: Rgb, background: Rgb) -> f64 {
    let l1 = relative_luminance(foreground);
    let l2 = relative_luminance(background);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}
