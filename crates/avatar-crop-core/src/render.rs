//! The crop-to-output render pipeline.
//!
//! [`render`] maps what the user framed in the viewport back to pixels:
//!
//! 1. Rotate the whole source about its center into an intermediate square
//!    surface of side `2 * max(width, height)`.
//! 2. Locate the crop on that surface: source offset + crop position.
//! 3. Copy exactly `crop.width x crop.height` pixels into a tight buffer.
//! 4. For `CropShape::Circle`, clear everything outside the inscribed circle.
//!
//! Encoding and artifact construction live in [`crate::export`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{PixelBuffer, CHANNELS};
use crate::mask::apply_shape_mask;
use crate::transform::{extract_region, intermediate_side, InterpolationFilter, RotatedSurface};
use crate::{CropRect, CropShape};

/// Errors raised while acquiring drawing surfaces.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A surface of the requested size cannot be allocated.
    #[error("Drawing surface unavailable: {width}x{height} exceeds limits or is empty")]
    SurfaceUnavailable { width: u64, height: u64 },
}

/// Largest surfaces the pipeline will create.
///
/// Defaults match the canvas limits of current browsers, so an export that
/// works here would also work in a browser canvas and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceLimits {
    /// Maximum width or height in pixels.
    pub max_side: u64,
    /// Maximum width * height in pixels.
    pub max_area: u64,
}

impl Default for SurfaceLimits {
    fn default() -> Self {
        Self {
            max_side: 32_767,
            max_area: 268_435_456,
        }
    }
}

impl SurfaceLimits {
    /// Check that a `width x height` surface can be acquired.
    pub fn acquire(&self, width: u64, height: u64) -> Result<(), RenderError> {
        let fits = width > 0
            && height > 0
            && width <= self.max_side
            && height <= self.max_side
            && width
                .checked_mul(height)
                .filter(|&area| area <= self.max_area)
                .and_then(|area| area.checked_mul(CHANNELS as u64))
                .is_some_and(|bytes| bytes <= usize::MAX as u64);

        if fits {
            Ok(())
        } else {
            Err(RenderError::SurfaceUnavailable { width, height })
        }
    }
}

/// Tunables for [`render_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Sampling filter for non-quarter-turn rotations.
    pub filter: InterpolationFilter,
    /// Surface size limits.
    pub limits: SurfaceLimits,
}

/// Render the crop with default options.
///
/// # Arguments
///
/// * `source` - Decoded, upright source image
/// * `crop` - Crop rectangle in the rotated display frame
/// * `rotation_degrees` - Clockwise rotation, any value (reduced mod 360)
/// * `shape` - Rectangle or circle
///
/// # Returns
///
/// A buffer of exactly `crop.width x crop.height` pixels.
///
/// # Example
///
/// ```ignore
/// use avatar_crop_core::{render, CropRect, CropShape};
///
/// let avatar = render(&image, &CropRect::new(50, 50, 200, 200), 90.0, CropShape::Circle)?;
/// assert_eq!((avatar.width, avatar.height), (200, 200));
/// ```
pub fn render(
    source: &PixelBuffer,
    crop: &CropRect,
    rotation_degrees: f64,
    shape: CropShape,
) -> Result<PixelBuffer, RenderError> {
    render_with(source, crop, rotation_degrees, shape, &RenderOptions::default())
}

/// Render the crop with explicit options.
pub fn render_with(
    source: &PixelBuffer,
    crop: &CropRect,
    rotation_degrees: f64,
    shape: CropShape,
    options: &RenderOptions,
) -> Result<PixelBuffer, RenderError> {
    let side = intermediate_side(source.width, source.height);
    options.limits.acquire(side, side)?;
    options
        .limits
        .acquire(crop.width as u64, crop.height as u64)?;

    let surface = RotatedSurface::new(source, rotation_degrees, options.filter);
    let mut output = extract_region(&surface, crop);
    apply_shape_mask(&mut output, shape);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::CircleMask;
    use crate::transform::normalize_degrees;

    /// Opaque source with a unique color per pixel.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                let hi = ((x / 256) * 16 + y / 256) as u8;
                img.put(x, y, [(x % 256) as u8, (y % 256) as u8, hi, 255]);
            }
        }
        img
    }

    #[test]
    fn test_output_matches_crop_dimensions() {
        let img = test_image(64, 48);
        for rotation in [0.0, 17.0, 90.0, 180.0, 233.5, 270.0] {
            let crop = CropRect::new(5, 3, 30, 20);
            let out = render(&img, &crop, rotation, CropShape::Rectangle).unwrap();
            assert_eq!((out.width, out.height), (30, 20), "rotation {}", rotation);
            assert_eq!(out.pixels.len(), 30 * 20 * 4);
        }
    }

    #[test]
    fn test_zero_rotation_is_direct_crop() {
        let img = test_image(40, 30);
        let crop = CropRect::new(7, 4, 16, 16);
        let out = render(&img, &crop, 0.0, CropShape::Rectangle).unwrap();

        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(out.get(x, y), img.get(x + 7, y + 4));
            }
        }
    }

    #[test]
    fn test_full_turns_are_identical() {
        let img = test_image(30, 20);
        let crop = CropRect::new(2, -3, 20, 20);
        for base in [0.0, 33.3, 90.0, -45.0] {
            let a = render(&img, &crop, base, CropShape::Circle).unwrap();
            let b = render(&img, &crop, base + 360.0, CropShape::Circle).unwrap();
            let c = render(&img, &crop, base - 720.0, CropShape::Circle).unwrap();
            assert_eq!(a, b, "base {}", base);
            assert_eq!(a, c, "base {}", base);
        }
    }

    #[test]
    fn test_profile_picture_scenario() {
        // 400x300 source, crop {50, 50, 200, 200}, 90° clockwise, circle
        let img = test_image(400, 300);
        let crop = CropRect::new(50, 50, 200, 200);
        let out = render(&img, &crop, 90.0, CropShape::Circle).unwrap();
        assert_eq!((out.width, out.height), (200, 200));

        let mask = CircleMask::inscribed(200, 200);
        for y in 0..200u32 {
            for x in 0..200u32 {
                let actual = out.get(x as i64, y as i64);
                if mask.contains_pixel(x, y) {
                    // Rotating 90° clockwise about (200, 150) sends source
                    // (sx, sy) to display (349 - sy, sx - 50).
                    let expected = img.get(y as i64 + 100, 299 - x as i64);
                    assert_eq!(actual, expected, "at ({}, {})", x, y);
                } else {
                    assert_eq!(actual, Some([0, 0, 0, 0]), "at ({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn test_circle_matches_rectangle_inside() {
        let img = test_image(80, 60);
        let crop = CropRect::new(10, 5, 50, 40);
        for rotation in [0.0, 30.0, 270.0] {
            let rect = render(&img, &crop, rotation, CropShape::Rectangle).unwrap();
            let circle = render(&img, &crop, rotation, CropShape::Circle).unwrap();
            let mask = CircleMask::inscribed(50, 40);

            for y in 0..40u32 {
                for x in 0..50u32 {
                    let (xi, yi) = (x as i64, y as i64);
                    if mask.contains_pixel(x, y) {
                        assert_eq!(circle.get(xi, yi), rect.get(xi, yi));
                    } else {
                        assert_eq!(circle.get(xi, yi), Some([0, 0, 0, 0]));
                    }
                }
            }
        }
    }

    #[test]
    fn test_180_rotation_mirrors_both_axes() {
        let img = test_image(10, 6);
        let out = render(&img, &CropRect::new(0, 0, 10, 6), 180.0, CropShape::Rectangle).unwrap();
        assert_eq!(out.get(0, 0), img.get(9, 5));
        assert_eq!(out.get(9, 5), img.get(0, 0));
        assert_eq!(out.get(3, 1), img.get(6, 4));
    }

    #[test]
    fn test_arbitrary_rotation_keeps_center_opaque() {
        let img = test_image(100, 100);
        let crop = CropRect::new(25, 25, 50, 50);
        let out = render(&img, &crop, 45.0, CropShape::Rectangle).unwrap();
        assert!(out.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_lanczos_filter_same_dimensions() {
        let img = test_image(50, 50);
        let options = RenderOptions {
            filter: InterpolationFilter::Lanczos3,
            ..Default::default()
        };
        let out = render_with(&img, &CropRect::new(0, 0, 50, 50), 15.0, CropShape::Circle, &options)
            .unwrap();
        assert_eq!((out.width, out.height), (50, 50));
    }

    #[test]
    fn test_empty_crop_is_surface_error() {
        let img = test_image(10, 10);
        let result = render(&img, &CropRect::new(0, 0, 0, 10), 0.0, CropShape::Rectangle);
        assert_eq!(
            result,
            Err(RenderError::SurfaceUnavailable {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_empty_source_is_surface_error() {
        let img = PixelBuffer::transparent(0, 0);
        let result = render(&img, &CropRect::new(0, 0, 10, 10), 0.0, CropShape::Rectangle);
        assert!(matches!(result, Err(RenderError::SurfaceUnavailable { .. })));
    }

    #[test]
    fn test_intermediate_over_limits_fails() {
        let img = test_image(64, 64);
        let options = RenderOptions {
            limits: SurfaceLimits {
                max_side: 100,
                max_area: 1_000_000,
            },
            ..Default::default()
        };
        // Intermediate is 128x128, over the 100px side limit
        let crop = CropRect::new(0, 0, 10, 10);
        let result = render_with(&img, &crop, 0.0, CropShape::Circle, &options);
        assert_eq!(
            result,
            Err(RenderError::SurfaceUnavailable {
                width: 128,
                height: 128
            })
        );
    }

    #[test]
    fn test_surface_limits() {
        let limits = SurfaceLimits::default();
        assert!(limits.acquire(1, 1).is_ok());
        assert!(limits.acquire(16_384, 16_384).is_ok());
        assert!(limits.acquire(32_767, 10).is_ok());
        assert!(limits.acquire(32_768, 10).is_err());
        assert!(limits.acquire(20_000, 20_000).is_err());
        assert!(limits.acquire(0, 5).is_err());
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::SurfaceUnavailable {
            width: 0,
            height: 3,
        };
        assert!(err.to_string().contains("0x3"));
    }

    #[test]
    fn test_normalized_rotation_equivalence() {
        let img = test_image(20, 12);
        let crop = CropRect::new(0, 0, 12, 12);
        let raw = render(&img, &crop, -30.0, CropShape::Rectangle).unwrap();
        let normalized =
            render(&img, &crop, normalize_degrees(-30.0), CropShape::Rectangle).unwrap();
        assert_eq!(raw, normalized);
    }

    #[test]
    fn test_full_turn_identical_at_half_step_angles() {
        let img = test_image(200, 200);
        let crop = CropRect::new(-40, -40, 280, 280);
        for rotation in [5e-7, 1.0000005, -5e-7] {
            let base = render(&img, &crop, rotation, CropShape::Circle).unwrap();
            let turned = render(&img, &crop, rotation + 360.0, CropShape::Circle).unwrap();
            assert_eq!(base, turned, "rotation {}", rotation);
        }
    }

    #[test]
    fn test_near_zero_rotation_takes_exact_path() {
        let img = test_image(30, 30);
        let crop = CropRect::new(0, 0, 30, 30);
        let exact = render(&img, &crop, 0.0, CropShape::Rectangle).unwrap();
        assert_eq!(render(&img, &crop, 5e-7, CropShape::Rectangle).unwrap(), exact);
        assert_eq!(render(&img, &crop, 360.0000005, CropShape::Rectangle).unwrap(), exact);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
