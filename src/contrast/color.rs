// SPDX-License-Identifier: PMPL-1.0-or-later
//! CSS color value parsing.
//!
//! Turns a raw declaration value (`#fff`, `navy`, `rgb(1, 2, 3)`,
//! `rgba(0, 0, 0, 0.5)`, `transparent`, ...) into an RGBA [`Color`].
//! Parsing fails open: anything unrecognised becomes opaque black so that
//! one bad value never stops a document from being validated.

use crate::error::{Result, ZooError};
use serde::Serialize;
use tracing::debug;

/// An RGBA color with 8-bit channels and a unit alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

/// An opaque RGB color, the result of compositing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color, clamping alpha into `[0, 1]`
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a: clamp_alpha(a) }
    }

    /// Create a color from unbounded channel values, clamping every channel
    pub fn from_channels(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_alpha(a),
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Parse a CSS color value strictly
    pub fn parse(value: &str) -> Result<Self> {
        let color = clean_value(value);

        if color.contains("transparent") || color.contains("inherit") {
            // `inherit` is deliberately not resolved against the parent
            return Ok(Color::TRANSPARENT);
        }

        if color.starts_with("rgb(") {
            return parse_rgb_function(&color)
                .or_else(|| parse_percent_rgb(&color))
                .ok_or_else(|| ZooError::MalformedColorValue(value.to_string()));
        }

        if color.starts_with("rgba(") {
            return parse_rgba_function(&color)
                .ok_or_else(|| ZooError::MalformedColorValue(value.to_string()));
        }

        parse_hex_color(&color)
            .or_else(|| parse_named_color(&color))
            .or_else(|| parse_percent_rgb(&color))
            .ok_or_else(|| ZooError::MalformedColorValue(value.to_string()))
    }

    /// Parse a CSS color value, falling back to opaque black
    pub fn parse_or_black(value: &str) -> Self {
        match Self::parse(value) {
            Ok(color) => color,
            Err(err) => {
                debug!("{}, using opaque black", err);
                Color::BLACK
            }
        }
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        Rgb::new(color.r, color.g, color.b)
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

fn clamp_alpha(value: f64) -> f64 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(0.0, 1.0)
}

/// Drop `!important`, stray minifier punctuation and case
fn clean_value(value: &str) -> String {
    let without_priority = value.split('!').next().unwrap_or("");
    without_priority
        .trim()
        .trim_matches(|c: char| c == ';' || c == '}' || c.is_whitespace())
        .to_lowercase()
}

/// Comma separated arguments between the parentheses of `name(...)`
fn function_args(value: &str) -> Option<Vec<&str>> {
    let open = value.find('(')?;
    let close = value.rfind(')')?;
    if close < open {
        return None;
    }
    Some(value[open + 1..close].split(',').map(str::trim).collect())
}

/// Parse `rgb(r, g, b)` with integer channels
fn parse_rgb_function(value: &str) -> Option<Color> {
    let args = function_args(value)?;
    if args.len() != 3 {
        return None;
    }
    let mut channels = [0i64; 3];
    for (slot, arg) in channels.iter_mut().zip(&args) {
        *slot = arg.parse().ok()?;
    }
    Some(Color::from_channels(
        channels[0] as f64,
        channels[1] as f64,
        channels[2] as f64,
        1.0,
    ))
}

/// Parse `rgba(r, g, b, a)`; channels may be integers or floats
fn parse_rgba_function(value: &str) -> Option<Color> {
    let args = function_args(value)?;
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let mut numbers = Vec::with_capacity(4);
    for arg in &args {
        numbers.push(arg.parse::<f64>().ok()?);
    }
    let alpha = numbers.get(3).copied().unwrap_or(1.0);
    Some(Color::from_channels(numbers[0], numbers[1], numbers[2], alpha))
}

/// Parse a CSS hex color (#rgb, #rrggbb)
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::rgb(r, g, b))
        }
        _ => None,
    }
}

/// Parse one of the CSS named colors
pub fn parse_named_color(name: &str) -> Option<Color> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let parsed = csscolorparser::parse(name).ok()?;
    let [r, g, b, _] = parsed.to_rgba8();
    Some(Color::rgb(r, g, b))
}

/// Parse percentage channels, either `rgb(10%, 20%, 30%)` or `10%, 20%, 30%`
pub fn parse_percent_rgb(value: &str) -> Option<Color> {
    let args: Vec<&str> = if value.contains('(') {
        function_args(value)?
    } else {
        value.split(',').map(str::trim).collect()
    };
    if args.len() != 3 {
        return None;
    }
    let mut channels = [0.0f64; 3];
    for (slot, arg) in channels.iter_mut().zip(&args) {
        let percent: f64 = arg.strip_suffix('%')?.trim().parse().ok()?;
        *slot = (255.0 * percent.clamp(0.0, 100.0) / 100.0).round();
    }
    Some(Color::from_channels(channels[0], channels[1], channels[2], 1.0))
}
