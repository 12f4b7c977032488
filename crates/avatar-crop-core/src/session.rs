//! One open crop dialog, from file load to apply.

use thiserror::Error;

use crate::config::CropConfig;
use crate::decode::{DecodeError, PixelBuffer};
use crate::export::{export_crop, ExportError, ExportOutcome, ExportRequest, SourceFile};
use crate::viewport::{CropSnapshot, Gesture, Viewport};

/// Errors raised while opening a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not load image: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Debug)]
struct Loaded {
    file: SourceFile,
    image: PixelBuffer,
    viewport: Viewport,
}

/// State of a single crop invocation.
///
/// Owns the decoded source and the viewport. `apply` renders from a snapshot
/// and closes the session when an artifact was produced.
#[derive(Debug)]
pub struct CropSession {
    config: CropConfig,
    loaded: Option<Loaded>,
}

impl CropSession {
    pub fn new(config: CropConfig) -> Self {
        Self {
            config: config.sanitized(),
            loaded: None,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Decode `file` and open a fresh viewport over it.
    ///
    /// Replaces any previously loaded file. On failure the session is left
    /// empty.
    pub fn load(&mut self, file: SourceFile) -> Result<CropSnapshot, SessionError> {
        self.loaded = None;
        let image = file.decode()?;
        let viewport = Viewport::new(image.width, image.height, &self.config);
        let snapshot = viewport.snapshot();

        tracing::debug!(
            name = file.name.as_deref().unwrap_or_default(),
            width = image.width,
            height = image.height,
            "Crop session loaded"
        );

        self.loaded = Some(Loaded {
            file,
            image,
            viewport,
        });
        Ok(snapshot)
    }

    /// Route a gesture to the viewport. `None` when nothing is loaded.
    pub fn handle(&mut self, gesture: Gesture) -> Option<CropSnapshot> {
        self.loaded
            .as_mut()
            .map(|loaded| loaded.viewport.handle(gesture))
    }

    pub fn snapshot(&self) -> Option<CropSnapshot> {
        self.loaded.as_ref().map(|loaded| loaded.viewport.snapshot())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The decoded source image.
    pub fn source(&self) -> Option<&PixelBuffer> {
        self.loaded.as_ref().map(|loaded| &loaded.image)
    }

    pub fn file(&self) -> Option<&SourceFile> {
        self.loaded.as_ref().map(|loaded| &loaded.file)
    }

    /// Export the current crop.
    ///
    /// A successful export closes the session; a skipped or failed one keeps
    /// it open so the user can retry.
    pub fn apply(&mut self) -> Result<ExportOutcome, ExportError> {
        let snapshot = self.snapshot();
        let request = ExportRequest {
            image: self.source(),
            file: self.file(),
            crop: snapshot.map(|s| s.rect),
            rotation: snapshot.map(|s| s.state.rotation).unwrap_or_default(),
            shape: snapshot.map(|s| s.state.shape).unwrap_or(self.config.shape),
            render: self.config.render,
            encode: self.config.encode,
        };

        let outcome = export_crop(&request)?;
        if outcome.is_exported() {
            self.close();
        }
        Ok(outcome)
    }

    /// Discard the loaded file and crop state.
    pub fn close(&mut self) {
        self.loaded = None;
    }
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(CropConfig::default())
    }
}
