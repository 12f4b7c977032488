//! Avatar Crop WASM - WebAssembly bindings for the avatar crop pipeline
//!
//! This crate exposes avatar-crop-core to a browser UI: a gesture-driven crop
//! session, the render pipeline, and export artifacts that can be turned into
//! real `File` objects.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings
//! - `session` - Crop session: load, gestures, apply
//! - `export` - Render and export bindings, artifact wrapper
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession } from '@avatar-crop/wasm';
//!
//! await init();
//!
//! const session = new JsCropSession({ shape: 'circle' });
//! session.load(new Uint8Array(await file.arrayBuffer()), file.name, file.type);
//! session.zoom(2);
//! const artifact = session.apply();
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod export;
mod session;
mod types;

// Re-export public types
pub use decode::{decode_image, image_orientation};
pub use export::{artifact_name, export_crop, render_crop, JsExportArtifact};
pub use session::JsCropSession;
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
