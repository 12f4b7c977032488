//! Avatar Crop Core - crop-to-output pipeline for profile pictures
//!
//! This crate turns a decoded image plus an interactive crop (pan, zoom,
//! rotation) into an exported artifact: an encoded image as a data URL and a
//! named file wrapper around the same bytes.
//!
//! # Module Structure
//!
//! - `viewport` - gesture handling, crop state and the derived crop rectangle
//! - `render` - the rotate, extract and mask pipeline
//! - `encode` - image encoding and data URLs
//! - `export` - artifact construction and the export outcome
//! - `session` - one open crop dialog, from file load to apply

pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod mask;
pub mod render;
pub mod session;
pub mod transform;
pub mod viewport;

pub use config::CropConfig;
pub use decode::{decode_image, DecodeError, PixelBuffer};
pub use encode::{EncodeError, EncodeOptions, OutputFormat};
pub use export::{
    artifact_name, export_crop, ArtifactFile, ExportArtifact, ExportError, ExportOutcome,
    ExportRequest, MissingInput, SourceFile,
};
pub use render::{render, render_with, RenderError, RenderOptions, SurfaceLimits};
pub use session::{CropSession, SessionError};
pub use viewport::{CropSnapshot, CropState, Gesture, Viewport};

use serde::{Deserialize, Serialize};

/// Output shape of the exported crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropShape {
    /// Keep the full rectangle.
    Rectangle,
    /// Clip to the inscribed circle (profile pictures).
    #[default]
    Circle,
}

impl CropShape {
    /// Parse the shape names used by embedding callers.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Some(CropShape::Rectangle),
            "circle" | "round" => Some(CropShape::Circle),
            _ => None,
        }
    }
}

/// A point or displacement in media pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned crop rectangle in integer pixels.
///
/// Coordinates are in the display frame: the image as shown after rotation
/// about its center, with the origin at the top-left corner of the
/// unrotated source box. With no rotation this is plain source pixel space.
/// `x` and `y` go negative when a rotated image extends past that box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width divided by height, or 0 for a degenerate rectangle.
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f64 / self.height as f64
    }

    /// Check if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
