//! Source image decoding.
//!
//! Turns the raw bytes of a user-selected file into an upright RGBA
//! [`PixelBuffer`]. EXIF orientation is honored so the buffer matches what the
//! user sees in the crop viewport.
//!
//! # Examples
//!
//! ```ignore
//! use avatar_crop_core::decode::decode_image;
//!
//! let bytes = std::fs::read("avatar.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod raster;
mod types;

pub use raster::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, Orientation, PixelBuffer, CHANNELS};
