// SPDX-License-Identifier: PMPL-1.0-or-later
//! Flattening a stack of (possibly translucent) colors into one opaque color.

use super::color::{Color, Rgb};

/// Weight applied to the already-composited channel when blending a layer
/// over it. Kept for output compatibility with existing reports.
const RETAINED_CHANNEL_WEIGHT: f64 = 0.25;

/// Colors declared along an element's ancestor chain, outermost first.
///
/// Position 0 always holds an opaque default so that flattening has an
/// anchor even when no ancestor declares an opaque color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStack {
    layers: Vec<Color>,
}

impl ColorStack {
    /// Start a stack from a default color; the default is forced opaque
    pub fn seeded(default: Color) -> Self {
        Self {
            layers: vec![Color { a: 1.0, ..default }],
        }
    }

    /// Push a more specific layer
    pub fn push(&mut self, color: Color) {
        self.layers.push(color);
    }

    pub fn layers(&self) -> &[Color] {
        &self.layers
    }

    /// Composite the stack into the color a reader would see
    pub fn flatten(&self) -> Rgb {
        generate_opaque_color(&self.layers)
    }
}

/// Composite an outermost-first color stack into one opaque color.
///
/// Walks back from the most specific layer, ignoring fully transparent
/// layers, until an opaque layer is reached. That layer is the anchor and
/// the collected translucent layers are blended over it, innermost last.
/// If nothing opaque is found the outermost collected layer anchors the
/// blend; an empty or fully transparent stack yields black.
pub fn generate_opaque_color(stack: &[Color]) -> Rgb {
    let mut collected: Vec<Color> = Vec::new();
    for color in stack.iter().rev() {
        if color.is_transparent() {
            continue;
        }
        collected.push(*color);
        if color.is_opaque() {
            break;
        }
    }

    let anchor = match collected.pop() {
        Some(anchor) => anchor,
        None => match stack.first() {
            Some(first) => *first,
            None => return Rgb::new(0, 0, 0),
        },
    };

    let mut red = anchor.r as f64;
    let mut green = anchor.g as f64;
    let mut blue = anchor.b as f64;
    let mut alpha = anchor.a;

    for layer in collected.iter().rev() {
        let a = layer.a;
        let da = 1.0 - a;
        alpha += a * da;
        if alpha == 0.0 {
            continue;
        }
        red = (red * RETAINED_CHANNEL_WEIGHT + layer.r as f64 * a * da) / alpha;
        green = (green * RETAINED_CHANNEL_WEIGHT + layer.g as f64 * a * da) / alpha;
        blue = (blue * RETAINED_CHANNEL_WEIGHT + layer.b as f64 * a * da) / alpha;
    }

    Rgb::new(truncate(red), truncate(green), truncate(blue))
}

fn truncate(channel: f64) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    channel.clamp(0.0, 255.0) as u8
}
