//! Viewport geometry: bounding boxes, fitted crop sizes and the derived
//! integer crop rectangle.
//!
//! All lengths are media pixels, i.e. source pixels at zoom 1.

use crate::config::{CropConfig, MIN_ZOOM};
use crate::transform::{rotated_origin, rotated_size};
use crate::{CropRect, Point};

/// Fixed facts about the media being cropped plus the zoom tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Source width in pixels.
    pub media_width: u32,
    /// Source height in pixels.
    pub media_height: u32,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Increment for one zoom step.
    pub zoom_step: f64,
    /// Wheel sensitivity.
    pub zoom_speed: f64,
}

impl ViewportGeometry {
    pub fn new(media_width: u32, media_height: u32, config: &CropConfig) -> Self {
        let config = config.sanitized();
        Self {
            media_width,
            media_height,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            zoom_speed: config.zoom_speed,
        }
    }

    /// Bounding box of the media rotated by `degrees`.
    pub fn bounding_box(&self, degrees: f64) -> (f64, f64) {
        rotated_size(self.media_width as f64, self.media_height as f64, degrees)
    }

    /// Clamp a zoom value into `[1, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(MIN_ZOOM, self.max_zoom.max(MIN_ZOOM))
    }

    /// Largest offset magnitude per axis at the given zoom and rotation.
    pub fn max_offset(&self, aspect: f64, zoom: f64, degrees: f64) -> (f64, f64) {
        let (bw, bh) = self.bounding_box(degrees);
        let (cw, ch) = base_crop_size(bw, bh, aspect);
        (
            ((bw * zoom - cw) / 2.0).max(0.0),
            ((bh * zoom - ch) / 2.0).max(0.0),
        )
    }

    /// Clamp an offset so the crop window stays inside the bounding box.
    pub fn clamp_offset(&self, offset: Point, aspect: f64, zoom: f64, degrees: f64) -> Point {
        let (mx, my) = self.max_offset(aspect, zoom, degrees);
        Point::new(offset.x.clamp(-mx, mx), offset.y.clamp(-my, my))
    }
}

/// Largest `aspect`-shaped rectangle that fits a `width x height` box.
pub fn base_crop_size(width: f64, height: f64, aspect: f64) -> (f64, f64) {
    if width >= height * aspect {
        (height * aspect, height)
    } else {
        (width, width / aspect)
    }
}

/// Derive the integer crop rectangle in the display frame.
///
/// The side limited by the bounding box is rounded from the zoomed crop size
/// and the other side follows from the aspect ratio. Both sizes are clamped to
/// the box, then the window is clamped inside it and translated by the box's
/// display-frame origin.
pub fn derive_crop_rect(
    geometry: &ViewportGeometry,
    offset: Point,
    zoom: f64,
    degrees: f64,
    aspect: f64,
) -> CropRect {
    let (bw, bh) = geometry.bounding_box(degrees);
    let (base_w, base_h) = base_crop_size(bw, bh, aspect);
    let (crop_w, crop_h) = (base_w / zoom, base_h / zoom);

    let limit_w = bw.floor().max(1.0);
    let limit_h = bh.floor().max(1.0);
    let (width, height) = if bw >= bh * aspect {
        let h = crop_h.round().clamp(1.0, limit_h);
        ((h * aspect).round().clamp(1.0, limit_w), h)
    } else {
        let w = crop_w.round().clamp(1.0, limit_w);
        (w, (w / aspect).round().clamp(1.0, limit_h))
    };

    let center_x = bw / 2.0 - offset.x / zoom;
    let center_y = bh / 2.0 - offset.y / zoom;
    let left = (center_x - width / 2.0).clamp(0.0, (bw - width).max(0.0));
    let top = (center_y - height / 2.0).clamp(0.0, (bh - height).max(0.0));

    let (origin_x, origin_y) =
        rotated_origin(geometry.media_width, geometry.media_height, degrees);

    CropRect::new(
        (origin_x + left).round() as i32,
        (origin_y + top).round() as i32,
        width as u32,
        height as u32,
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
