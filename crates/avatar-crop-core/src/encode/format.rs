//! Output format selection from the source file's declared MIME type.

use serde::{Deserialize, Serialize};

/// Image formats the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Baseline lossy JPEG; transparency is flattened.
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
    /// Lossless WebP with alpha.
    Webp,
}

impl OutputFormat {
    /// Pick the output format for a declared MIME type.
    ///
    /// No type at all means the baseline lossy default (JPEG). A declared type
    /// that cannot be encoded falls back to PNG, the way a browser canvas
    /// does for unsupported export types.
    pub fn for_mime(mime_type: Option<&str>) -> Self {
        let Some(mime) = mime_type.map(str::trim).filter(|m| !m.is_empty()) else {
            return OutputFormat::Jpeg;
        };

        // Parameters such as "; charset=" never matter for images
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => OutputFormat::Jpeg,
            "image/png" => OutputFormat::Png,
            "image/webp" => OutputFormat::Webp,
            _ => OutputFormat::Png,
        }
    }

    /// Canonical MIME type of this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }
}
