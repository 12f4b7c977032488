//! Extraction of the crop rectangle from the rotated intermediate surface.
//!
//! Crop rectangles are expressed in the display frame: the frame of the image
//! as the user sees it after rotation, with its origin at the top-left corner
//! of the unrotated source box. On the intermediate surface that corner sits
//! at [`RotatedSurface::source_offset`], so the crop's top-left on the surface
//! is simply `source_offset + (crop.x, crop.y)`.

use super::rotation::RotatedSurface;
use crate::decode::PixelBuffer;
use crate::CropRect;

/// Copy exactly `crop.width x crop.height` pixels out of `surface`.
///
/// No further rotation is applied: the surface already holds the rotated
/// image. Pixels the rotated image does not cover come out transparent.
pub fn extract_region(surface: &RotatedSurface<'_>, crop: &CropRect) -> PixelBuffer {
    let (offset_x, offset_y) = surface.source_offset();
    let left = offset_x + crop.x as i64;
    let top = offset_y + crop.y as i64;

    let mut output = PixelBuffer::transparent(crop.width, crop.height);
    for y in 0..crop.height {
        for x in 0..crop.width {
            output.put(x, y, surface.pixel(left + x as i64, top + y as i64));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::InterpolationFilter;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                img.put(x, y, [v, v, v, 255]);
            }
        }
        img
    }

    #[test]
    fn test_unrotated_crop_is_direct_copy() {
        let img = test_image(10, 10);
        let surface = RotatedSurface::new(&img, 0.0, InterpolationFilter::Bilinear);
        let result = extract_region(&surface, &CropRect::new(3, 3, 4, 4));

        assert_eq!(result.width, 4);
        assert_eq!(result.height, 4);
        // First pixel comes from (3, 3): (3 * 10 + 3) % 256 = 33
        assert_eq!(result.get(0, 0), Some([33, 33, 33, 255]));
        assert_eq!(result.get(3, 3), img.get(6, 6));
    }

    #[test]
    fn test_full_crop() {
        let img = test_image(12, 7);
        let surface = RotatedSurface::new(&img, 0.0, InterpolationFilter::Bilinear);
        let result = extract_region(&surface, &CropRect::new(0, 0, 12, 7));
        assert_eq!(result, img);
    }

    #[test]
    fn test_crop_outside_image_is_transparent() {
        let img = test_image(10, 10);
        let surface = RotatedSurface::new(&img, 0.0, InterpolationFilter::Bilinear);
        let result = extract_region(&surface, &CropRect::new(-2, 8, 4, 4));

        assert_eq!(result.width, 4);
        assert_eq!(result.height, 4);
        assert_eq!(result.get(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(result.get(2, 0), img.get(0, 8));
        assert_eq!(result.get(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_crop_beyond_surface_is_transparent() {
        let img = test_image(4, 4);
        let surface = RotatedSurface::new(&img, 0.0, InterpolationFilter::Bilinear);
        let result = extract_region(&surface, &CropRect::new(1000, 1000, 2, 2));
        assert!(result.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_negative_frame_coordinates_after_rotation() {
        // 6x2 rotated 90° is 2x6 and extends 2px above the unrotated box
        let img = test_image(6, 2);
        let surface = RotatedSurface::new(&img, 90.0, InterpolationFilter::Bilinear);
        let result = extract_region(&surface, &CropRect::new(2, -2, 2, 6));

        assert!(result.pixels.chunks(4).all(|px| px[3] == 255));
        // Top-left of a clockwise-rotated image is the source's bottom-left
        assert_eq!(result.get(0, 0), img.get(0, 1));
        assert_eq!(result.get(1, 0), img.get(0, 0));
        assert_eq!(result.get(1, 5), img.get(5, 0));
    }

    #[test]
    fn test_zero_sized_crop() {
        let img = test_image(4, 4);
        let surface = RotatedSurface::new(&img, 0.0, InterpolationFilter::Bilinear);
        let result = extract_region(&surface, &CropRect::new(0, 0, 0, 3));
        assert!(result.is_empty());
    }
}
