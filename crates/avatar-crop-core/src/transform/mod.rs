//! Geometric transforms used by the render pipeline: rotation and cropping.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//!   (y axis points down), reduced mod 360 before any trigonometry
//! - Crop rectangles are integer pixels in the display frame, whose origin is the
//!   unrotated source box's top-left corner
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::extract_region;
pub use rotation::{
    intermediate_side, normalize_degrees, quarter_turns, rotated_origin, rotated_size,
    InterpolationFilter, RotatedSurface,
};
