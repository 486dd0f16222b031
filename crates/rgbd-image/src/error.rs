use crate::frame::PixelFormat;

/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the data length does not match the image shape.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel ({0}, {1}) out of bounds for image {2}x{3}")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the frame pitch is smaller than one packed row.
    #[error("Pitch ({0}) is smaller than a packed row ({1})")]
    InvalidPitch(usize, usize),

    /// Error when the buffer length does not match pitch * height.
    #[error("Buffer length ({0}) does not match pitch * height ({1})")]
    InvalidBufferLength(usize, usize),

    /// Error when a frame does not have the expected pixel format.
    #[error("Unexpected pixel format {0}, expected {1}")]
    UnexpectedFormat(PixelFormat, PixelFormat),
}
