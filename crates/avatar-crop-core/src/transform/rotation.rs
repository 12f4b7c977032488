//! Rotation of the source image into the intermediate surface.
//!
//! The intermediate surface is a square of side `2 * max(width, height)` with
//! the source placed at its center and rotated about its own center. Any
//! rotation fits: the diagonal of the source is always shorter than the side.
//!
//! The surface is never rasterized as a whole. [`RotatedSurface::pixel`]
//! answers "what color is surface pixel (x, y)" on demand, so extracting a
//! crop only samples the pixels the crop covers.
//!
//! # Algorithm
//!
//! Quarter turns use an exact integer pixel mapping. Any other angle uses
//! inverse mapping: for each destination pixel center we find the source
//! position it came from and interpolate there.
//!
//! For a clockwise rotation by θ (y axis pointing down), the inverse transform
//! relative to the shared center is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ)
//! src_y = -dx * sin(θ) + dy * cos(θ)
//! ```

use crate::decode::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Angles within this of a multiple of 90° take the exact quarter-turn path.
///
/// Spans several snapping steps, so neighboring snapped angles never fall on
/// opposite sides of it.
const QUARTER_TURN_EPSILON: f64 = 1e-5;

/// Interpolation filter for arbitrary-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationFilter {
    /// Bilinear interpolation, equivalent to a canvas with default smoothing.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation - sharper, slower.
    Lanczos3,
}

/// Steps per degree that normalized angles are snapped to (2^20).
///
/// A power of two keeps scaling exact, and rounding ties sit on binary
/// fractions that `θ + 360k` represents without error.
const ANGLE_RESOLUTION: f64 = 1_048_576.0;

/// Reduce an unbounded angle in degrees into `[0, 360)`.
///
/// The result is snapped to a grid of about one micro-degree: `θ + 360k`
/// carries the rounding error of the addition, and snapping makes it
/// normalize to the same value as `θ`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = (degrees.rem_euclid(360.0) * ANGLE_RESOLUTION).round() / ANGLE_RESOLUTION;
    // Tiny negative inputs and snapping can both land on exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Number of clockwise quarter turns if `degrees` is a multiple of 90°.
pub fn quarter_turns(degrees: f64) -> Option<u8> {
    let normalized = normalize_degrees(degrees);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() <= QUARTER_TURN_EPSILON {
        Some((turns as u8) % 4)
    } else {
        None
    }
}

/// Dimensions of the bounding box of a `width x height` rectangle rotated by
/// `degrees` about its center.
///
/// Quarter turns return the exact swapped or unchanged dimensions.
pub fn rotated_size(width: f64, height: f64, degrees: f64) -> (f64, f64) {
    match quarter_turns(degrees) {
        Some(0) | Some(2) => (width, height),
        Some(_) => (height, width),
        None => {
            let radians = normalize_degrees(degrees).to_radians();
            let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
            (width * cos + height * sin, width * sin + height * cos)
        }
    }
}

/// Display-frame position of the rotated bounding box's top-left corner.
///
/// The frame origin is the unrotated source box's top-left corner and both
/// boxes share a center. Quarter turns that swap dimensions round a half-pixel
/// offset down so the rotated pixels land on the integer grid.
pub fn rotated_origin(width: u32, height: u32, degrees: f64) -> (f64, f64) {
    let (w, h) = (width as i64, height as i64);
    match quarter_turns(degrees) {
        Some(0) | Some(2) => (0.0, 0.0),
        Some(_) => ((w - h).div_euclid(2) as f64, (h - w).div_euclid(2) as f64),
        None => {
            let (bw, bh) = rotated_size(width as f64, height as f64, degrees);
            ((width as f64 - bw) / 2.0, (height as f64 - bh) / 2.0)
        }
    }
}

/// Side length of the intermediate surface for a source of the given size.
pub fn intermediate_side(width: u32, height: u32) -> u64 {
    2 * width.max(height) as u64
}

/// The source image rotated about its center inside a square scratch surface.
#[derive(Debug, Clone)]
pub struct RotatedSurface<'a> {
    source: &'a PixelBuffer,
    side: u64,
    offset_x: i64,
    offset_y: i64,
    turns: Option<u8>,
    quarter_origin: (i64, i64),
    cos: f64,
    sin: f64,
    filter: InterpolationFilter,
}

impl<'a> RotatedSurface<'a> {
    /// Describe `source` rotated clockwise by `rotation_degrees`.
    pub fn new(
        source: &'a PixelBuffer,
        rotation_degrees: f64,
        filter: InterpolationFilter,
    ) -> Self {
        let degrees = normalize_degrees(rotation_degrees);
        let radians = degrees.to_radians();
        let side = intermediate_side(source.width, source.height);
        let (origin_x, origin_y) = rotated_origin(source.width, source.height, degrees);

        Self {
            source,
            side,
            offset_x: (side as i64 - source.width as i64) / 2,
            offset_y: (side as i64 - source.height as i64) / 2,
            turns: quarter_turns(degrees),
            quarter_origin: (origin_x as i64, origin_y as i64),
            cos: radians.cos(),
            sin: radians.sin(),
            filter,
        }
    }

    /// Side length of the square surface.
    pub fn side(&self) -> u64 {
        self.side
    }

    /// Position of the unrotated source box's top-left corner on the surface.
    pub fn source_offset(&self) -> (i64, i64) {
        (self.offset_x, self.offset_y)
    }

    /// Color of surface pixel (x, y). Pixels the rotated image does not cover
    /// are transparent.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= self.side as i64 || y >= self.side as i64 {
            return [0; 4];
        }
        self.frame_pixel(x - self.offset_x, y - self.offset_y)
    }

    /// Color at display-frame pixel (fx, fy), where the frame origin is the
    /// unrotated source box's top-left corner.
    fn frame_pixel(&self, fx: i64, fy: i64) -> [u8; 4] {
        let src = self.source;
        let (w, h) = (src.width as i64, src.height as i64);

        match self.turns {
            Some(turns) => {
                let (dx, dy) = self.quarter_origin;
                let (sx, sy) = match turns {
                    0 => (fx, fy),
                    1 => (fy - dy, h - 1 - (fx - dx)),
                    2 => (w - 1 - fx, h - 1 - fy),
                    _ => (w - 1 - (fy - dy), fx - dx),
                };
                src.get_or_transparent(sx, sy)
            }
            None => {
                let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
                let dx = fx as f64 + 0.5 - cx;
                let dy = fy as f64 + 0.5 - cy;

                // Back to source pixel-index space (pixel centers at integers)
                let src_x = dx * self.cos + dy * self.sin + cx - 0.5;
                let src_y = -dx * self.sin + dy * self.cos + cy - 0.5;

                match self.filter {
                    InterpolationFilter::Bilinear => sample_bilinear(src, src_x, src_y),
                    InterpolationFilter::Lanczos3 => sample_lanczos3(src, src_x, src_y),
                }
            }
        }
    }
}

/// Accumulates premultiplied samples so transparent neighbors do not bleed
/// their color into the result.
#[derive(Default)]
struct Accumulator {
    rgb: [f64; 3],
    alpha: f64,
    weight: f64,
}

impl Accumulator {
    #[inline]
    fn add(&mut self, pixel: [u8; 4], weight: f64) {
        let a = pixel[3] as f64 * weight;
        self.rgb[0] += pixel[0] as f64 * a;
        self.rgb[1] += pixel[1] as f64 * a;
        self.rgb[2] += pixel[2] as f64 * a;
        self.alpha += a;
        self.weight += weight;
    }

    fn finish(self) -> [u8; 4] {
        if self.weight <= 0.0 {
            return [0; 4];
        }
        let alpha = self.alpha / self.weight;
        if alpha <= 0.0 {
            return [0; 4];
        }
        let channel = |sum: f64| (sum / self.alpha).clamp(0.0, 255.0).round() as u8;
        [
            channel(self.rgb[0]),
            channel(self.rgb[1]),
            channel(self.rgb[2]),
            alpha.clamp(0.0, 255.0).round() as u8,
        ]
    }
}

/// Sample using bilinear interpolation over the 4 nearest pixels.
///
/// Neighbors outside the image count as transparent, which antialiases the
/// rotated image's edges.
fn sample_bilinear(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);
    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return [0; 4];
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = Accumulator::default();
    for (px, py, weight) in [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ] {
        if weight > 0.0 {
            acc.add(image.get_or_transparent(px, py), weight);
        }
    }

    acc.finish()
}

/// Sample using Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Falls back to bilinear within the kernel radius of an edge.
fn sample_lanczos3(image: &PixelBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut acc = Accumulator::default();
    for ky in -2..=3 {
        for kx in -2..=3 {
            let (px, py) = (x0 + kx, y0 + ky);
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            if weight != 0.0 {
                acc.add(image.get_or_transparent(px, py), weight);
            }
        }
    }

    acc.finish()
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
