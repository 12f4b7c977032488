//! WASM-compatible wrapper types and conversion helpers.
//!
//! This module provides JavaScript-friendly types that wrap the core types,
//! handling the conversion between Rust and JavaScript data representations.

use avatar_crop_core::{CropConfig, PixelBuffer};
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// # Memory Management
///
/// `pixels()` copies the data into a JavaScript `Uint8Array`; the buffer
/// itself stays in WASM memory until `free()` is called or the finalizer runs.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Wrap RGBA pixel data (4 bytes per pixel, row-major order).
    ///
    /// # Errors
    /// Returns an error if the data length is not `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Invalid pixel data: expected {} bytes, got {}",
                expected,
                pixels.len()
            )));
        }
        Ok(Self::from_buffer(PixelBuffer::new(width, height, pixels)))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGBA pixel data as a Uint8Array copy, ready for `ImageData`.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn buffer(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// Read a `CropConfig` from a JS options object.
///
/// `undefined` and `null` give the defaults; missing fields take their
/// default values.
pub(crate) fn config_from_js(options: JsValue) -> Result<CropConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CropConfig::default());
    }
    let config: CropConfig = serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop options: {}", e)))?;
    Ok(config.sanitized())
}

/// Log an error to the browser console and turn it into a JS error value.
pub(crate) fn report_error(context: &str, error: impl std::fmt::Display) -> JsValue {
    let message = JsValue::from_str(&format!("{}: {}", context, error));
    web_sys::console::error_1(&message);
    message
}
