//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@avatar-crop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(image.pixels()), image.width), 0, 0);
//! ```

use crate::types::{report_error, JsPixelBuffer};
use avatar_crop_core::decode;
use wasm_bindgen::prelude::*;

/// Decode a JPEG, PNG or WebP file to RGBA, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the bytes are empty, in an unknown format, or corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    decode::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| report_error("Decode failed", e))
}

/// EXIF orientation value (1-8) of the file, 1 when absent.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}
