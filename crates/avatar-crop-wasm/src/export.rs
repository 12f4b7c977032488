//! Render and export WASM bindings.
//!
//! # Functions
//!
//! - [`render_crop`] - Run the rotate, extract and mask pipeline
//! - [`export_crop`] - Render, encode and wrap the crop as an artifact
//! - [`artifact_name`] - File name given to an exported crop
//!
//! # Example
//!
//! ```typescript
//! const artifact = export_crop(image, 50, 50, 200, 200, 90, 'circle', file.name, file.type);
//! if (artifact) {
//!   preview.src = artifact.data_url;
//!   form.append('avatar', artifact.to_file());
//! }
//! ```

use avatar_crop_core::export::{self, ExportArtifact, ExportOutcome, ExportRequest, SourceFile};
use avatar_crop_core::{render_with, CropRect, CropShape};
use wasm_bindgen::prelude::*;

use crate::types::{config_from_js, report_error, JsPixelBuffer};

/// An exported crop: the encoded image as a data URL and as file bytes.
#[wasm_bindgen]
pub struct JsExportArtifact {
    inner: ExportArtifact,
}

#[wasm_bindgen]
impl JsExportArtifact {
    /// `data:<mime>;base64,...` URL, usable directly as an `<img>` source.
    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> String {
        self.inner.data_url.clone()
    }

    /// File name, `cropped-<original name>`.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.file.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.file.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.inner.file.size()
    }

    /// Encoded bytes as a Uint8Array copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.file.bytes.clone()
    }

    /// Build a browser `File` carrying the artifact's name, type and bytes.
    ///
    /// # Errors
    /// Returns an error if the browser rejects the `File` construction.
    pub fn to_file(&self) -> Result<web_sys::File, JsValue> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(self.inner.file.bytes.as_slice()));

        let options = web_sys::FilePropertyBag::new();
        options.set_type(&self.inner.file.mime_type);

        web_sys::File::new_with_u8_array_sequence_and_options(
            &parts,
            &self.inner.file.name,
            &options,
        )
        .map_err(|e| {
            web_sys::console::error_2(&JsValue::from_str("Could not create file:"), &e);
            e
        })
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsExportArtifact {
    pub(crate) fn from_artifact(inner: ExportArtifact) -> Self {
        Self { inner }
    }
}

/// Parse a shape name, defaulting to a circle for unknown names.
pub(crate) fn shape_from_str(name: &str) -> CropShape {
    CropShape::from_name(name).unwrap_or_default()
}

/// Name given to the exported file for a source file name.
#[wasm_bindgen]
pub fn artifact_name(source_name: Option<String>) -> String {
    export::artifact_name(source_name.as_deref())
}

/// Render a crop of `image` without encoding it.
///
/// # Arguments
///
/// * `x`, `y`, `width`, `height` - Crop rectangle in the rotated display frame
/// * `rotation` - Clockwise degrees, any value
/// * `shape` - `"circle"` or `"rectangle"`
/// * `options` - Optional partial `CropConfig` object
///
/// # Errors
/// Returns an error if a drawing surface cannot be acquired.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn render_crop(
    image: &JsPixelBuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    rotation: f64,
    shape: &str,
    options: JsValue,
) -> Result<JsPixelBuffer, JsValue> {
    let config = config_from_js(options)?;
    let crop = CropRect::new(x, y, width, height);

    render_with(image.buffer(), &crop, rotation, shape_from_str(shape), &config.render)
        .map(JsPixelBuffer::from_buffer)
        .map_err(|e| report_error("Render failed", e))
}

/// Render, encode and wrap a crop.
///
/// The output type follows `mime_type` (JPEG when absent). Returns
/// `undefined` when the crop is empty, i.e. there is nothing to export.
///
/// # Errors
/// Returns an error if rendering, encoding or data URL handling fails.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn export_crop(
    image: &JsPixelBuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    rotation: f64,
    shape: &str,
    name: Option<String>,
    mime_type: Option<String>,
    options: JsValue,
) -> Result<Option<JsExportArtifact>, JsValue> {
    let config = config_from_js(options)?;
    let file = SourceFile {
        name,
        mime_type,
        bytes: Vec::new(),
    };
    let crop = CropRect::new(x, y, width, height);

    let request = ExportRequest {
        image: Some(image.buffer()),
        file: Some(&file),
        crop: (!crop.is_empty()).then_some(crop),
        rotation,
        shape: shape_from_str(shape),
        render: config.render,
        encode: config.encode,
    };

    match export::export_crop(&request) {
        Ok(ExportOutcome::Exported(artifact)) => {
            Ok(Some(JsExportArtifact::from_artifact(artifact)))
        }
        Ok(ExportOutcome::Skipped(_)) => Ok(None),
        Err(e) => Err(report_error("Export failed", e)),
    }
}
