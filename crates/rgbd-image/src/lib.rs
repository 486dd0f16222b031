#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for the image module.
pub mod error;
pub use crate::error::ImageError;

/// raw sensor frame buffer types.
pub mod frame;
pub use crate::frame::{FrameBuffer, PixelFormat};

/// image types and pixel containers.
pub mod image;
pub use crate::image::{Image, ImageSize};
