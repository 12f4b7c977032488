//! Per-invocation configuration supplied by the embedding caller.
//!
//! Every field has a default, so callers can pass a partial object (for
//! example `{ "shape": "rectangle" }` from JavaScript) and get sensible values
//! for the rest.

use serde::{Deserialize, Serialize};

use crate::encode::EncodeOptions;
use crate::render::RenderOptions;
use crate::CropShape;

/// Default maximum zoom factor.
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;
/// Minimum zoom factor; the crop window never exceeds the image.
pub const MIN_ZOOM: f64 = 1.0;
/// Default zoom slider and keyboard step.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

/// Configuration for one crop invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Crop aspect ratio (width / height). 1.0 for square avatars.
    pub aspect: f64,
    /// Output shape.
    pub shape: CropShape,
    /// Upper zoom bound (lower bound is always 1).
    pub max_zoom: f64,
    /// Zoom increment for `Gesture::ZoomStep`.
    pub zoom_step: f64,
    /// Wheel sensitivity multiplier.
    pub zoom_speed: f64,
    /// Encoder settings.
    pub encode: EncodeOptions,
    /// Render pipeline settings.
    pub render: RenderOptions,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            shape: CropShape::Circle,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            zoom_speed: 1.0,
            encode: EncodeOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

impl CropConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace nonsensical values with usable ones.
    pub fn sanitized(&self) -> Self {
        let positive_or = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        Self {
            aspect: positive_or(self.aspect, 1.0),
            shape: self.shape,
            max_zoom: if self.max_zoom.is_finite() {
                self.max_zoom.max(MIN_ZOOM)
            } else {
                DEFAULT_MAX_ZOOM
            },
            zoom_step: positive_or(self.zoom_step, DEFAULT_ZOOM_STEP),
            zoom_speed: positive_or(self.zoom_speed, 1.0),
            encode: self.encode.sanitized(),
            render: self.render,
        }
    }
}
