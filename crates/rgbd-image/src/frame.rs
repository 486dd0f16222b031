use std::time::Duration;

use crate::{
    error::ImageError,
    image::{Image, ImageSize},
};

/// Pixel formats produced by RGB-D sensor streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16-bit linear depth, one little-endian `u16` per pixel.
    Z16,
    /// 8-bit interleaved RGB, three bytes per pixel.
    Rgb8,
}

impl PixelFormat {
    /// Number of bytes occupied by a single pixel.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Z16 => 2,
            PixelFormat::Rgb8 => 3,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PixelFormat::Z16 => write!(f, "Z16"),
            PixelFormat::Rgb8 => write!(f, "RGB8"),
        }
    }
}

/// A raw frame delivered by a sensor stream.
///
/// Holds the packed byte buffer together with its geometry (width, height,
/// pitch), pixel format, and acquisition metadata (timestamp relative to the
/// start of the stream, sequence number). Rows are `pitch` bytes apart and a
/// row may carry padding past `width * bytes_per_pixel`. The buffer is
/// immutable once constructed; consumers only read it.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    data: Vec<u8>,
    size: ImageSize,
    pitch: usize,
    format: PixelFormat,
    timestamp: Duration,
    sequence: u32,
}

impl FrameBuffer {
    /// Create a frame buffer from raw bytes.
    ///
    /// # Arguments
    ///
    /// * `size` - The frame size in pixels.
    /// * `format` - The pixel format of the buffer.
    /// * `pitch` - The number of bytes per row, at least `width * bytes_per_pixel`.
    /// * `data` - The raw bytes, exactly `pitch * height` long.
    /// * `timestamp` - The acquisition time relative to the start of the stream.
    /// * `sequence` - The frame sequence number.
    ///
    /// # Errors
    ///
    /// If the pitch is smaller than one packed row, or the buffer length does
    /// not match `pitch * height`, an error is returned.
    pub fn new(
        size: ImageSize,
        format: PixelFormat,
        pitch: usize,
        data: Vec<u8>,
        timestamp: Duration,
        sequence: u32,
    ) -> Result<Self, ImageError> {
        let row_bytes = size.width * format.bytes_per_pixel();
        if pitch < row_bytes {
            return Err(ImageError::InvalidPitch(pitch, row_bytes));
        }
        if data.len() != pitch * size.height {
            return Err(ImageError::InvalidBufferLength(
                data.len(),
                pitch * size.height,
            ));
        }

        Ok(Self {
            data,
            size,
            pitch,
            format,
            timestamp,
            sequence,
        })
    }

    /// Create a frame buffer with no row padding (`pitch == width * bytes_per_pixel`).
    pub fn new_packed(
        size: ImageSize,
        format: PixelFormat,
        data: Vec<u8>,
        timestamp: Duration,
        sequence: u32,
    ) -> Result<Self, ImageError> {
        let pitch = size.width * format.bytes_per_pixel();
        Self::new(size, format, pitch, data, timestamp, sequence)
    }

    /// Get the frame size in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the frame width in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the frame height in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of bytes per row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Get the pixel format of the frame.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Get the acquisition timestamp relative to the start of the stream.
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    /// Get the frame sequence number.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Get the raw bytes, including any row padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the packed bytes of one row, excluding padding.
    ///
    /// Returns `None` if the row is out of bounds.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.size.height {
            return None;
        }
        let start = y * self.pitch;
        Some(&self.data[start..start + self.size.width * self.format.bytes_per_pixel()])
    }

    /// Sample a depth value from a Z16 frame.
    ///
    /// Returns `None` if the frame is not Z16 or the coordinates are out of bounds.
    pub fn z16_at(&self, x: usize, y: usize) -> Option<u16> {
        if self.format != PixelFormat::Z16 || x >= self.size.width {
            return None;
        }
        let row = self.row(y)?;
        let bytes = [row[2 * x], row[2 * x + 1]];
        Some(u16::from_le_bytes(bytes))
    }

    /// Copy an RGB8 frame into a packed [`Image`], dropping row padding.
    ///
    /// # Errors
    ///
    /// If the frame is not RGB8, an error is returned.
    pub fn to_rgb8_image(&self) -> Result<Image<u8, 3>, ImageError> {
        if self.format != PixelFormat::Rgb8 {
            return Err(ImageError::UnexpectedFormat(self.format, PixelFormat::Rgb8));
        }

        let row_bytes = self.size.width * 3;
        let mut data = Vec::with_capacity(row_bytes * self.size.height);
        for chunk in self.data.chunks_exact(self.pitch) {
            data.extend_from_slice(&chunk[..row_bytes]);
        }

        Image::new(self.size, data)
    }
}
