//! Crop state and the gesture transition function.

use serde::{Deserialize, Serialize};

use super::geometry::{derive_crop_rect, ViewportGeometry};
use crate::config::CropConfig;
use crate::transform::normalize_degrees;
use crate::{CropRect, CropShape, Point};

/// Divisor applied to wheel deltas before they scale zoom.
const WHEEL_DELTA_DIVISOR: f64 = 200.0;

/// User input the viewport understands.
///
/// Pan deltas and anchors are media pixels at zoom 1: a screen-space delta
/// divided by the display scale at which zoom 1 is shown. Anchors are
/// measured from the center of the crop window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Gesture {
    /// Drag by a displacement.
    Pan { dx: f64, dy: f64 },
    /// Set zoom directly (slider).
    Zoom { zoom: f64 },
    /// Set zoom keeping the image point under `anchor` fixed (pinch).
    ZoomAt { zoom: f64, anchor: Point },
    /// Mouse wheel; positive `delta_y` zooms out.
    Wheel { delta_y: f64, anchor: Point },
    /// Change zoom by `steps` zoom steps (keyboard or buttons).
    ZoomStep { steps: f64 },
    /// Rotate relative to the current angle.
    RotateBy { degrees: f64 },
    /// Set an absolute rotation.
    SetRotation { degrees: f64 },
    /// Back to offset 0, zoom 1, rotation 0.
    Reset,
}

impl Gesture {
    /// Whether every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        let point_ok = |p: &Point| p.x.is_finite() && p.y.is_finite();
        match self {
            Gesture::Pan { dx, dy } => dx.is_finite() && dy.is_finite(),
            Gesture::Zoom { zoom } => zoom.is_finite(),
            Gesture::ZoomAt { zoom, anchor } => zoom.is_finite() && point_ok(anchor),
            Gesture::Wheel { delta_y, anchor } => delta_y.is_finite() && point_ok(anchor),
            Gesture::ZoomStep { steps } => steps.is_finite(),
            Gesture::RotateBy { degrees } | Gesture::SetRotation { degrees } => {
                degrees.is_finite()
            }
            Gesture::Reset => true,
        }
    }
}

/// The crop as the user currently frames it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropState {
    /// Image translation relative to the crop window, media pixels at zoom 1.
    pub offset: Point,
    /// Zoom factor in `[1, max_zoom]`.
    pub zoom: f64,
    /// Clockwise rotation in `[0, 360)` degrees.
    pub rotation: f64,
    /// Crop width / height.
    pub aspect: f64,
    /// Output shape.
    pub shape: CropShape,
}

impl CropState {
    /// Initial state for a fresh invocation.
    pub fn new(config: &CropConfig) -> Self {
        let config = config.sanitized();
        Self {
            offset: Point::default(),
            zoom: 1.0,
            rotation: 0.0,
            aspect: config.aspect,
            shape: config.shape,
        }
    }

    /// Apply one gesture, returning the next state.
    ///
    /// Gestures carrying non-finite values leave the state unchanged.
    pub fn apply(&self, gesture: Gesture, geometry: &ViewportGeometry) -> CropState {
        if !gesture.is_finite() {
            return *self;
        }

        match gesture {
            Gesture::Pan { dx, dy } => {
                let offset = Point::new(self.offset.x + dx, self.offset.y + dy);
                self.with_view(offset, self.zoom, self.rotation, geometry)
            }
            Gesture::Zoom { zoom } => {
                let zoom = geometry.clamp_zoom(zoom);
                self.with_view(self.offset, zoom, self.rotation, geometry)
            }
            Gesture::ZoomAt { zoom, anchor } => self.zoom_at(zoom, anchor, geometry),
            Gesture::Wheel { delta_y, anchor } => {
                let zoom = self.zoom - delta_y * geometry.zoom_speed / WHEEL_DELTA_DIVISOR;
                self.zoom_at(zoom, anchor, geometry)
            }
            Gesture::ZoomStep { steps } => {
                let zoom = geometry.clamp_zoom(self.zoom + steps * geometry.zoom_step);
                self.with_view(self.offset, zoom, self.rotation, geometry)
            }
            Gesture::RotateBy { degrees } => {
                self.with_view(self.offset, self.zoom, self.rotation + degrees, geometry)
            }
            Gesture::SetRotation { degrees } => {
                self.with_view(self.offset, self.zoom, degrees, geometry)
            }
            Gesture::Reset => CropState {
                offset: Point::default(),
                zoom: 1.0,
                rotation: 0.0,
                ..*self
            },
        }
    }

    /// Integer crop rectangle for this state.
    pub fn crop_rect(&self, geometry: &ViewportGeometry) -> CropRect {
        derive_crop_rect(geometry, self.offset, self.zoom, self.rotation, self.aspect)
    }

    fn zoom_at(&self, zoom: f64, anchor: Point, geometry: &ViewportGeometry) -> CropState {
        let zoom = geometry.clamp_zoom(zoom);
        // Keep the image point under the anchor in place
        let scale = zoom / self.zoom;
        let offset = Point::new(
            anchor.x - (anchor.x - self.offset.x) * scale,
            anchor.y - (anchor.y - self.offset.y) * scale,
        );
        self.with_view(offset, zoom, self.rotation, geometry)
    }

    fn with_view(
        &self,
        offset: Point,
        zoom: f64,
        rotation: f64,
        geometry: &ViewportGeometry,
    ) -> CropState {
        let rotation = normalize_degrees(rotation);
        CropState {
            offset: geometry.clamp_offset(offset, self.aspect, zoom, rotation),
            zoom,
            rotation,
            ..*self
        }
    }
}
