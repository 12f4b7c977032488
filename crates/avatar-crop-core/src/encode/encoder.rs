//! Encoding of rendered pixel buffers.
//!
//! Uses the `image` crate's JPEG, PNG and WebP encoders. All three are
//! deterministic: the same buffer and options always give the same bytes.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::OutputFormat;
use crate::decode::{PixelBuffer, CHANNELS};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    /// JPEG quality (1-100). Defaults to 92, a browser canvas' default.
    pub jpeg_quality: u8,
    /// Color transparent pixels are flattened onto for JPEG output.
    pub jpeg_background: [u8; 3],
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 92,
            jpeg_background: [0, 0, 0],
        }
    }
}

impl EncodeOptions {
    /// Clamp quality to the valid 1-100 range.
    pub fn sanitized(&self) -> Self {
        Self {
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
            jpeg_background: self.jpeg_background,
        }
    }
}

/// Encode an RGBA buffer to `format`.
///
/// # Errors
///
/// Returns an error if:
/// - Width or height is zero
/// - The pixel data length doesn't match width * height * 4
/// - The encoder fails internally
pub fn encode_image(
    buffer: &PixelBuffer,
    format: OutputFormat,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (buffer.width, buffer.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * CHANNELS;
    if buffer.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: buffer.pixels.len(),
        });
    }

    let failed = |e: image::ImageError| EncodeError::EncodingFailed {
        format,
        message: e.to_string(),
    };

    let mut out = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg => {
            let options = options.sanitized();
            let rgb = flatten_alpha(&buffer.pixels, options.jpeg_background);
            JpegEncoder::new_with_quality(&mut out, options.jpeg_quality)
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(failed)?;
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut out)
                .write_image(&buffer.pixels, width, height, ExtendedColorType::Rgba8)
                .map_err(failed)?;
        }
        OutputFormat::Webp => {
            WebPEncoder::new_lossless(&mut out)
                .write_image(&buffer.pixels, width, height, ExtendedColorType::Rgba8)
                .map_err(failed)?;
        }
    }

    Ok(out.into_inner())
}

/// Composite straight-alpha RGBA over an opaque background, producing RGB.
fn flatten_alpha(rgba: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / CHANNELS * 3);
    for px in rgba.chunks_exact(CHANNELS) {
        let alpha = px[3] as u32;
        for c in 0..3 {
            let value = (px[c] as u32 * alpha + background[c] as u32 * (255 - alpha) + 127) / 255;
            rgb.push(value as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_image;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut img = PixelBuffer::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                img.put(x, y, [(x * 255 / width) as u8, (y * 255 / height) as u8, 128, 255]);
            }
        }
        img
    }

    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let jpeg = encode_image(&gradient(100, 100), OutputFormat::Jpeg, &EncodeOptions::default())
            .unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_magic_bytes() {
        let png = encode_image(&gradient(10, 10), OutputFormat::Png, &EncodeOptions::default())
            .unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_webp_magic_bytes() {
        let webp = encode_image(&gradient(10, 10), OutputFormat::Webp, &EncodeOptions::default())
            .unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_png_round_trip_preserves_transparency() {
        let mut img = gradient(8, 8);
        img.put(0, 0, [0, 0, 0, 0]);
        img.put(7, 7, [10, 20, 30, 40]);

        let png = encode_image(&img, OutputFormat::Png, &EncodeOptions::default()).unwrap();
        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_jpeg_flattens_onto_background() {
        let img = PixelBuffer::new(8, 8, vec![0u8; 8 * 8 * 4]);
        let options = EncodeOptions {
            jpeg_background: [255, 255, 255],
            ..Default::default()
        };
        let jpeg = encode_image(&img, OutputFormat::Jpeg, &options).unwrap();
        let decoded = decode_image(&jpeg).unwrap();

        let px = decoded.get(4, 4).unwrap();
        assert!(px[0] > 245 && px[1] > 245 && px[2] > 245, "got {:?}", px);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_flatten_alpha() {
        let rgba = [200, 100, 50, 255, 200, 100, 50, 0, 255, 255, 255, 128];
        let rgb = flatten_alpha(&rgba, [0, 0, 0]);
        assert_eq!(&rgb[0..3], &[200, 100, 50]);
        assert_eq!(&rgb[3..6], &[0, 0, 0]);
        assert_eq!(&rgb[6..9], &[128, 128, 128]);
    }

    #[test]
    fn test_encoding_twice_is_identical() {
        let img = gradient(32, 24);
        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Webp] {
            let a = encode_image(&img, format, &EncodeOptions::default()).unwrap();
            let b = encode_image(&img, format, &EncodeOptions::default()).unwrap();
            assert_eq!(a, b, "{:?} is not deterministic", format);
        }
    }

    #[test]
    fn test_zero_dimensions() {
        let img = PixelBuffer::transparent(0, 10);
        let result = encode_image(&img, OutputFormat::Png, &EncodeOptions::default());
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_invalid_pixel_data() {
        let img = PixelBuffer {
            width: 10,
            height: 10,
            pixels: vec![0u8; 10 * 9 * 4],
        };
        let result = encode_image(&img, OutputFormat::Jpeg, &EncodeOptions::default());
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 400,
                actual: 360
            })
        ));
    }

    #[test]
    fn test_quality_clamping() {
        let img = gradient(10, 10);
        for quality in [0u8, 255] {
            let options = EncodeOptions {
                jpeg_quality: quality,
                ..Default::default()
            };
            assert!(encode_image(&img, OutputFormat::Jpeg, &options).is_ok());
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn format_strategy() -> impl Strategy<Value = OutputFormat> {
        prop_oneof![
            Just(OutputFormat::Jpeg),
            Just(OutputFormat::Png),
            Just(OutputFormat::Webp),
        ]
    }

    proptest! {
        /// Property: same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=16, 1u32..=16),
            format in format_strategy(),
            quality in 1u8..=100,
            seed in any::<u8>(),
        ) {
            let pixels: Vec<u8> = (0..(width * height * 4) as usize)
                .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
                .collect();
            let img = PixelBuffer::new(width, height, pixels);
            let options = EncodeOptions { jpeg_quality: quality, ..Default::default() };

            let a = encode_image(&img, format, &options);
            let b = encode_image(&img, format, &options);
            prop_assert!(a.is_ok() && b.is_ok());
            prop_assert_eq!(a.unwrap(), b.unwrap());
        }

        /// Property: mismatched pixel data length always returns an error.
        #[test]
        fn prop_invalid_pixel_length_returns_error(
            (width, height) in (1u32..=16, 1u32..=16),
            delta in 1usize..=10,
            longer in any::<bool>(),
        ) {
            let expected = (width * height * 4) as usize;
            let actual = if longer { expected + delta } else { expected.saturating_sub(delta) };
            let img = PixelBuffer { width, height, pixels: vec![128u8; actual] };

            let result = encode_image(&img, OutputFormat::Png, &EncodeOptions::default());
            prop_assert!(
                matches!(result, Err(EncodeError::InvalidPixelData { .. })),
                "Mismatched pixel data should return InvalidPixelData error"
            );
        }
    }
}
