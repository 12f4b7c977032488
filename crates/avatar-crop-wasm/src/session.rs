//! Crop session WASM bindings.
//!
//! A `JsCropSession` backs one open crop dialog. Gesture methods return the
//! updated snapshot as a plain object:
//!
//! ```typescript
//! {
//!   state: { offset: { x, y }, zoom, rotation, aspect, shape },
//!   rect: { x, y, width, height },
//! }
//! ```
//!
//! # Example
//!
//! ```typescript
//! const session = new JsCropSession({ shape: 'circle', max_zoom: 8 });
//! session.load(new Uint8Array(await file.arrayBuffer()), file.name, file.type);
//!
//! slider.oninput = () => render(session.zoom(slider.valueAsNumber));
//! rotateButton.onclick = () => render(session.rotate_by(90));
//!
//! const artifact = session.apply();
//! if (artifact) closeDialog(artifact.to_file());
//! ```

use avatar_crop_core::{CropSession, CropSnapshot, Gesture, Point, SourceFile};
use wasm_bindgen::prelude::*;

use crate::export::JsExportArtifact;
use crate::types::{config_from_js, report_error, JsPixelBuffer};

#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Open a session with an optional partial `CropConfig` object.
    ///
    /// # Errors
    /// Returns an error if `options` cannot be deserialized.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsCropSession, JsValue> {
        Ok(Self {
            inner: CropSession::new(config_from_js(options)?),
        })
    }

    /// Decode the selected file and reset the viewport.
    ///
    /// # Errors
    /// Returns an error if the file cannot be decoded.
    pub fn load(
        &mut self,
        bytes: Vec<u8>,
        name: Option<String>,
        mime_type: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let file = SourceFile {
            name,
            mime_type,
            bytes,
        };
        let snapshot = self
            .inner
            .load(file)
            .map_err(|e| report_error("Could not open image", e))?;
        snapshot_to_js(Some(snapshot))
    }

    #[wasm_bindgen(getter)]
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    /// The decoded source, for drawing the viewport.
    pub fn source(&self) -> Option<JsPixelBuffer> {
        self.inner
            .source()
            .map(|image| JsPixelBuffer::from_buffer(image.clone()))
    }

    /// Current snapshot, or `null` before a file is loaded.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        snapshot_to_js(self.inner.snapshot())
    }

    /// Apply a gesture object such as `{ type: 'pan', dx: 3, dy: -4 }`.
    pub fn handle(&mut self, gesture: JsValue) -> Result<JsValue, JsValue> {
        let gesture: Gesture = serde_wasm_bindgen::from_value(gesture)
            .map_err(|e| JsValue::from_str(&format!("Invalid gesture: {}", e)))?;
        self.dispatch(gesture)
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::Pan { dx, dy })
    }

    /// Slider zoom, clamped to `[1, max_zoom]`.
    pub fn zoom(&mut self, zoom: f64) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::Zoom { zoom })
    }

    /// Pinch zoom around an anchor measured from the crop window's center.
    pub fn zoom_at(&mut self, zoom: f64, anchor_x: f64, anchor_y: f64) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::ZoomAt {
            zoom,
            anchor: Point::new(anchor_x, anchor_y),
        })
    }

    pub fn wheel(
        &mut self,
        delta_y: f64,
        anchor_x: f64,
        anchor_y: f64,
    ) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::Wheel {
            delta_y,
            anchor: Point::new(anchor_x, anchor_y),
        })
    }

    pub fn zoom_step(&mut self, steps: f64) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::ZoomStep { steps })
    }

    pub fn rotate_by(&mut self, degrees: f64) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::RotateBy { degrees })
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::SetRotation { degrees })
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.dispatch(Gesture::Reset)
    }

    /// Export the current crop.
    ///
    /// Returns the artifact and closes the session, or `undefined` when
    /// nothing is loaded (the session stays open).
    ///
    /// # Errors
    /// Returns an error if rendering or encoding fails.
    pub fn apply(&mut self) -> Result<Option<JsExportArtifact>, JsValue> {
        let outcome = self
            .inner
            .apply()
            .map_err(|e| report_error("Crop export failed", e))?;
        Ok(outcome.into_artifact().map(JsExportArtifact::from_artifact))
    }

    /// Discard the loaded image and crop state.
    pub fn close(&mut self) {
        self.inner.close();
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsCropSession {
    fn dispatch(&mut self, gesture: Gesture) -> Result<JsValue, JsValue> {
        snapshot_to_js(self.inner.handle(gesture))
    }
}

fn snapshot_to_js(snapshot: Option<CropSnapshot>) -> Result<JsValue, JsValue> {
    match snapshot {
        Some(snapshot) => serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Could not serialize crop: {}", e))),
        None => Ok(JsValue::NULL),
    }
}
