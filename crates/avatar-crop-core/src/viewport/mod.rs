//! Interactive viewport: gestures in, crop state and crop rectangle out.
//!
//! The viewport owns the only mutable [`CropState`] of an invocation. Every
//! gesture goes through [`CropState::apply`], after which the integer
//! [`CropRect`] is recomputed and returned as a [`CropSnapshot`]. The render
//! pipeline only ever sees snapshots.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::{CropConfig, Gesture, Viewport};
//!
//! let mut viewport = Viewport::new(400, 300, &CropConfig::default());
//! viewport.handle(Gesture::Zoom { zoom: 2.0 });
//! let snapshot = viewport.handle(Gesture::RotateBy { degrees: 90.0 });
//! assert_eq!(snapshot.rect.width, snapshot.rect.height);
//! ```

mod geometry;
mod state;

pub use geometry::{base_crop_size, derive_crop_rect, ViewportGeometry};
pub use state::{CropState, Gesture};

use serde::{Deserialize, Serialize};

use crate::config::CropConfig;
use crate::CropRect;

/// Consistent copy of the crop state and its derived rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSnapshot {
    pub state: CropState,
    pub rect: CropRect,
}

/// Gesture-driven crop viewport over one media item.
#[derive(Debug, Clone)]
pub struct Viewport {
    geometry: ViewportGeometry,
    state: CropState,
    rect: CropRect,
}

impl Viewport {
    /// Open a viewport over a `media_width x media_height` image.
    pub fn new(media_width: u32, media_height: u32, config: &CropConfig) -> Self {
        let geometry = ViewportGeometry::new(media_width, media_height, config);
        let state = CropState::new(config);
        let rect = state.crop_rect(&geometry);
        Self {
            geometry,
            state,
            rect,
        }
    }

    /// Apply a gesture and return the updated snapshot.
    pub fn handle(&mut self, gesture: Gesture) -> CropSnapshot {
        let next = self.state.apply(gesture, &self.geometry);
        if next != self.state {
            self.state = next;
            self.rect = next.crop_rect(&self.geometry);
            tracing::debug!(
                ?gesture,
                zoom = next.zoom,
                rotation = next.rotation,
                x = self.rect.x,
                y = self.rect.y,
                width = self.rect.width,
                height = self.rect.height,
                "Crop changed"
            );
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> CropSnapshot {
        CropSnapshot {
            state: self.state,
            rect: self.rect,
        }
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
