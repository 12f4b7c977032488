//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Choosing the output format from the source's declared MIME type
//! - Encoding rendered buffers to JPEG, PNG or WebP
//! - Building and parsing base64 data URLs
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::encode::{data_url, encode_image, EncodeOptions, OutputFormat};
//!
//! let format = OutputFormat::for_mime(Some("image/png"));
//! let bytes = encode_image(&buffer, format, &EncodeOptions::default()).unwrap();
//! let url = data_url::encode(format.mime_type(), &bytes);
//! ```

pub mod data_url;
mod encoder;
mod format;

pub use data_url::{DataUrl, PayloadError};
pub use encoder::{encode_image, EncodeError, EncodeOptions};
pub use format::OutputFormat;
