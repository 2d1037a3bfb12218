//! Conversion options.
//!
//! Every field has a default, so an options file only needs the values it
//! changes:
//!
//! ```json
//! { "minCurveSegments": 32, "strict": true }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bezier::MAX_CURVE_SEGMENTS;
use crate::error::ConvertError;
use crate::model::{DEFAULT_LAYER, MIN_CURVE_SEGMENTS, PX_PER_MM};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Source pixels per output millimetre.
    pub px_per_mm: f64,
    /// Layer for shapes whose stroke does not name one.
    pub default_layer: u32,
    /// Floor on the number of segments per flattened curve.
    pub min_curve_segments: usize,
    /// Abort the whole conversion on the first bad path instead of
    /// dropping that path and carrying on.
    pub strict: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            px_per_mm: PX_PER_MM,
            default_layer: DEFAULT_LAYER,
            min_curve_segments: MIN_CURVE_SEGMENTS,
            strict: false,
        }
    }
}

impl ConvertOptions {
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values that would produce non-finite points or invalid layers.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !(self.px_per_mm.is_finite() && self.px_per_mm > 0.0) {
            return Err(ConvertError::InvalidOption {
                name: "pxPerMm",
                reason: format!("must be a positive number, got {}", self.px_per_mm),
            });
        }
        if !(1..=255).contains(&self.default_layer) {
            return Err(ConvertError::InvalidOption {
                name: "defaultLayer",
                reason: format!("must be a layer from 1 to 255, got {}", self.default_layer),
            });
        }
        if !(1..=MAX_CURVE_SEGMENTS).contains(&self.min_curve_segments) {
            return Err(ConvertError::InvalidOption {
                name: "minCurveSegments",
                reason: format!(
                    "must be between 1 and {}, got {}",
                    MAX_CURVE_SEGMENTS, self.min_curve_segments
                ),
            });
        }
        Ok(())
    }
}
