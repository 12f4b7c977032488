//! Base64 `data:` URLs: the text-embeddable form of an encoded image.
//!
//! `encode` builds `data:<mime>;base64,<payload>`; `decode` re-derives the
//! binary payload, the same way a browser resolves such a URL when it is
//! fetched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Errors raised while re-deriving bytes from a data URL.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The text does not start with `data:`.
    #[error("Not a data URL")]
    MissingPrefix,

    /// There is no `,` separating the header from the payload.
    #[error("Data URL has no payload separator")]
    MissingSeparator,

    /// The header does not declare base64 encoding.
    #[error("Data URL is not base64 encoded")]
    NotBase64,

    /// The payload is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// Declared media type, empty when the URL declares none.
    pub mime_type: String,
    /// Binary payload.
    pub bytes: Vec<u8>,
}

/// Build a base64 data URL.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    let payload = STANDARD.encode(bytes);
    let mut url = String::with_capacity(5 + mime_type.len() + 8 + payload.len());
    url.push_str("data:");
    url.push_str(mime_type);
    url.push_str(";base64,");
    url.push_str(&payload);
    url
}

/// Parse a base64 data URL back into its media type and bytes.
pub fn decode(url: &str) -> Result<DataUrl, PayloadError> {
    let rest = url
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &url[5..])
        .ok_or(PayloadError::MissingPrefix)?;

    let (header, payload) = rest.split_once(',').ok_or(PayloadError::MissingSeparator)?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_string();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(PayloadError::NotBase64);
    }

    let bytes = STANDARD.decode(payload.trim())?;
    Ok(DataUrl { mime_type, bytes })
}
