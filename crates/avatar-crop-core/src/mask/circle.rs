//! Circular clip mask.
//!
//! The circle inscribed in the output: centered on the buffer, radius
//! `min(width, height) / 2`. Equivalent to drawing the crop and then
//! compositing it "destination-in" against a filled arc.

use crate::decode::{PixelBuffer, CHANNELS};

/// Circle in pixel coordinates.
///
/// # Example
/// ```ignore
/// use avatar_crop_core::mask::CircleMask;
///
/// let mask = CircleMask::inscribed(200, 200);
/// assert!(mask.contains_pixel(100, 100));
/// assert!(!mask.contains_pixel(0, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMask {
    /// Center X in pixels
    pub center_x: f64,
    /// Center Y in pixels
    pub center_y: f64,
    /// Radius in pixels
    pub radius: f64,
}

impl CircleMask {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius: radius.max(0.0),
        }
    }

    /// The circle inscribed in a `width x height` surface.
    pub fn inscribed(width: u32, height: u32) -> Self {
        Self::new(
            width as f64 / 2.0,
            height as f64 / 2.0,
            width.min(height) as f64 / 2.0,
        )
    }

    /// Check if a point lies inside the circle or on its boundary.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Check pixel (x, y) by its center.
    #[inline]
    pub fn contains_pixel(&self, x: u32, y: u32) -> bool {
        self.contains(x as f64 + 0.5, y as f64 + 0.5)
    }
}

/// Clear every pixel of `buffer` whose center lies outside the inscribed circle.
pub fn apply_circle_mask(buffer: &mut PixelBuffer) {
    let mask = CircleMask::inscribed(buffer.width, buffer.height);
    let width = buffer.width as usize;

    for (index, pixel) in buffer.pixels.chunks_exact_mut(CHANNELS).enumerate() {
        let x = (index % width) as u32;
        let y = (index / width) as u32;
        if !mask.contains_pixel(x, y) {
            pixel.fill(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                img.put(x, y, [(x * 7 % 256) as u8, (y * 3 % 256) as u8, 90, 255]);
            }
        }
        img
    }

    #[test]
    fn test_inscribed_square() {
        let mask = CircleMask::inscribed(200, 200);
        assert_eq!(mask.center_x, 100.0);
        assert_eq!(mask.center_y, 100.0);
        assert_eq!(mask.radius, 100.0);
    }

    #[test]
    fn test_inscribed_uses_shorter_side() {
        let mask = CircleMask::inscribed(300, 100);
        assert_eq!(mask.center_x, 150.0);
        assert_eq!(mask.radius, 50.0);
        assert!(!mask.contains_pixel(10, 50));
        assert!(mask.contains_pixel(150, 50));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let mask = CircleMask::new(0.0, 0.0, 5.0);
        assert!(mask.contains(3.0, 4.0));
        assert!(!mask.contains(3.0, 4.01));
    }

    #[test]
    fn test_negative_radius_clamped() {
        let mask = CircleMask::new(1.0, 1.0, -3.0);
        assert_eq!(mask.radius, 0.0);
        assert!(!mask.contains(1.0, 1.01));
    }

    #[test]
    fn test_apply_clears_outside_only() {
        let original = opaque(40, 40);
        let mut masked = original.clone();
        apply_circle_mask(&mut masked);
        let mask = CircleMask::inscribed(40, 40);

        for y in 0..40 {
            for x in 0..40 {
                if mask.contains_pixel(x, y) {
                    assert_eq!(masked.get(x as i64, y as i64), original.get(x as i64, y as i64));
                } else {
                    assert_eq!(masked.get(x as i64, y as i64), Some([0, 0, 0, 0]));
                }
            }
        }
    }

    #[test]
    fn test_apply_covers_about_pi_over_four() {
        let mut masked = opaque(100, 100);
        apply_circle_mask(&mut masked);
        let kept = masked.pixels.chunks(4).filter(|px| px[3] == 255).count();
        let expected = std::f64::consts::PI * 50.0 * 50.0;
        assert!((kept as f64 - expected).abs() < 100.0, "kept {} pixels", kept);
    }

    #[test]
    fn test_apply_on_empty_buffer() {
        let mut empty = PixelBuffer::transparent(0, 0);
        apply_circle_mask(&mut empty);
        assert!(empty.is_empty());
    }
}
