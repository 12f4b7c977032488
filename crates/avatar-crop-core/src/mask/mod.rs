//! Shape masks applied to the rendered crop.
//!
//! Masks are evaluated per pixel center. A pixel either keeps its color
//! untouched or becomes fully transparent; there is no feathering.

mod circle;

pub use circle::{apply_circle_mask, CircleMask};

use crate::decode::PixelBuffer;
use crate::CropShape;

/// Apply the mask for `shape` to `buffer` in place.
///
/// `CropShape::Rectangle` leaves the buffer unchanged.
pub fn apply_shape_mask(buffer: &mut PixelBuffer, shape: CropShape) {
    match shape {
        CropShape::Rectangle => {}
        CropShape::Circle => apply_circle_mask(buffer),
    }
}
