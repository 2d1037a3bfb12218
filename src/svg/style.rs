//! Decoding of a path's `style` (and presentation attributes) into the
//! drafting properties the converter cares about.
//!
//! The drawing encodes EAGLE properties in ordinary SVG styling:
//!
//! | SVG              | EAGLE                                   |
//! |------------------|-----------------------------------------|
//! | `fill`           | `none` ⇒ WIRE, anything else ⇒ POLYGON  |
//! | `stroke`         | red channel of `#rrggbb` ⇒ layer        |
//! | `stroke-width`   | px ⇒ line weight in mm                  |

use tracing::debug;

use crate::model::FillMode;

/// Drafting properties decoded from one path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub fill_mode: FillMode,
    /// `None` when the stroke is absent or not a hex colour.
    pub layer: Option<u32>,
    /// Stroke width in source px.
    pub stroke_width_px: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Unfilled,
            layer: None,
            stroke_width_px: 0.0,
        }
    }
}

impl PathStyle {
    /// Apply one `key: value` declaration. Unknown keys are ignored.
    pub fn apply(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key.trim() {
            "fill" => {
                self.fill_mode = if value == "none" {
                    FillMode::Unfilled
                } else {
                    FillMode::Filled
                };
            }
            "stroke" => {
                self.layer = stroke_layer(value);
            }
            "stroke-width" => {
                if let Some(width) = leading_number(value) {
                    self.stroke_width_px = width;
                } else {
                    debug!(value, "ignoring unreadable stroke-width");
                }
            }
            _ => {}
        }
    }

    /// Apply a `style` attribute (`key:value;key:value`).
    pub fn apply_style(&mut self, style: &str) {
        for declaration in style.split(';') {
            if let Some((key, value)) = declaration.split_once(':') {
                self.apply(key, value);
            }
        }
    }
}

/// The numeric prefix of a length like `1.5px`.
fn leading_number(value: &str) -> Option<f64> {
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Layer encoded in a stroke colour: the red channel of `#rrggbb` or `#rgb`.
///
/// Any other colour syntax (names, `rgb()`, `none`) carries no layer.
pub fn stroke_layer(value: &str) -> Option<u32> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let red = match hex.len() {
        3 => hex.get(0..1)?.repeat(2),
        6 => hex.get(0..2)?.to_string(),
        _ => return None,
    };
    u8::from_str_radix(&red, 16).ok().map(u32::from)
}
