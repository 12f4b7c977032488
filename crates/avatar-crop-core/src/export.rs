//! Export: render, encode and wrap the crop as a dual-form artifact.
//!
//! An export produces the encoded image twice over: as a base64 data URL for
//! previews and as a named file (re-derived from that URL) for upload. Missing
//! inputs are not errors; they yield [`ExportOutcome::Skipped`] and the caller
//! keeps its dialog open.

use std::fmt;

use thiserror::Error;

use crate::decode::{decode_image, DecodeError, PixelBuffer};
use crate::encode::{data_url, encode_image, EncodeError, EncodeOptions, OutputFormat, PayloadError};
use crate::render::{render_with, RenderError, RenderOptions};
use crate::{CropRect, CropShape};

/// Prefix added to the source file name.
pub const ARTIFACT_PREFIX: &str = "cropped-";
/// Artifact name when the source has no name.
pub const FALLBACK_ARTIFACT_NAME: &str = "cropped-image.jpg";

/// The user's selected file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFile {
    pub name: Option<String>,
    /// Declared MIME type, as reported by the file picker.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Byte size of the file.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Decode the file into an upright source image.
    pub fn decode(&self) -> Result<PixelBuffer, DecodeError> {
        decode_image(&self.bytes)
    }
}

/// The file half of an export artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ArtifactFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// A finished export: the same encoded image as a data URL and as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub data_url: String,
    pub file: ArtifactFile,
}

/// Inputs to one export. Any missing input skips the export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportRequest<'a> {
    pub image: Option<&'a PixelBuffer>,
    pub file: Option<&'a SourceFile>,
    pub crop: Option<CropRect>,
    /// Clockwise degrees, any value.
    pub rotation: f64,
    pub shape: CropShape,
    pub render: RenderOptions,
    pub encode: EncodeOptions,
}

/// The precondition an export was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    Image,
    CropRect,
    SourceFile,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            MissingInput::Image => "no decoded image",
            MissingInput::CropRect => "no crop rectangle",
            MissingInput::SourceFile => "no source file",
        };
        f.write_str(what)
    }
}

/// Result of an export attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(ExportArtifact),
    Skipped(MissingInput),
}

impl ExportOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self, ExportOutcome::Exported(_))
    }

    pub fn artifact(&self) -> Option<&ExportArtifact> {
        match self {
            ExportOutcome::Exported(artifact) => Some(artifact),
            ExportOutcome::Skipped(_) => None,
        }
    }

    pub fn into_artifact(self) -> Option<ExportArtifact> {
        match self {
            ExportOutcome::Exported(artifact) => Some(artifact),
            ExportOutcome::Skipped(_) => None,
        }
    }
}

/// Errors that abort an export. No partial artifact is produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Could not re-derive file bytes: {0}")]
    Payload(#[from] PayloadError),
}

/// Name of the exported file for a source file name.
///
/// A missing or empty name gives `cropped-image.jpg`.
pub fn artifact_name(source_name: Option<&str>) -> String {
    match source_name.filter(|name| !name.is_empty()) {
        Some(name) => format!("{}{}", ARTIFACT_PREFIX, name),
        None => FALLBACK_ARTIFACT_NAME.to_string(),
    }
}

/// Run an export.
///
/// # Errors
///
/// Fails when a drawing surface cannot be acquired, when encoding fails, or
/// when the data URL cannot be turned back into bytes. Failures are logged at
/// error level before being returned.
pub fn export_crop(request: &ExportRequest<'_>) -> Result<ExportOutcome, ExportError> {
    let result = run_export(request);
    if let Err(e) = &result {
        tracing::error!(error = %e, "Crop export failed");
    }
    result
}

fn run_export(request: &ExportRequest<'_>) -> Result<ExportOutcome, ExportError> {
    let (image, crop, file) = match (request.image, request.crop, request.file) {
        (None, _, _) => return Ok(skip(MissingInput::Image)),
        (_, None, _) => return Ok(skip(MissingInput::CropRect)),
        (_, _, None) => return Ok(skip(MissingInput::SourceFile)),
        (Some(image), Some(crop), Some(file)) => (image, crop, file),
    };

    let format = OutputFormat::for_mime(file.mime_type.as_deref());
    let output = render_with(image, &crop, request.rotation, request.shape, &request.render)?;
    let encoded = encode_image(&output, format, &request.encode)?;

    let url = data_url::encode(format.mime_type(), &encoded);
    let payload = data_url::decode(&url)?;

    let artifact = ExportArtifact {
        data_url: url,
        file: ArtifactFile {
            name: artifact_name(file.name.as_deref()),
            mime_type: payload.mime_type,
            bytes: payload.bytes,
        },
    };

    tracing::info!(
        name = %artifact.file.name,
        mime_type = %artifact.file.mime_type,
        width = output.width,
        height = output.height,
        bytes = artifact.file.size(),
        "Crop exported"
    );

    Ok(ExportOutcome::Exported(artifact))
}

fn skip(missing: MissingInput) -> ExportOutcome {
    tracing::debug!(%missing, "Crop export skipped");
    ExportOutcome::Skipped(missing)
}
