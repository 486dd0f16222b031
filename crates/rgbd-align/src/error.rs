use rgbd_image::{ImageError, ImageSize, PixelFormat};

/// An error type for UV-map generation.
#[derive(thiserror::Error, Debug)]
pub enum ProjectionError {
    /// The depth frame has an unsupported pixel format.
    #[error("Unsupported depth format {0}, expected {1}")]
    UnsupportedFormat(PixelFormat, PixelFormat),

    /// Failed to build the UV map container.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// An error type for the alignment resampler.
#[derive(thiserror::Error, Debug)]
pub enum AlignError {
    /// The color frame has an unsupported pixel format.
    #[error("Unsupported color format {0}, expected {1}")]
    UnsupportedFormat(PixelFormat, PixelFormat),

    /// The output image grid does not match the UV map grid.
    #[error("Output size {0} does not match the uv map grid {1}")]
    SizeMismatch(ImageSize, ImageSize),
}
