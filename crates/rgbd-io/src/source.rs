use std::time::Duration;

use rgbd_image::{FrameBuffer, ImageSize, PixelFormat};

use crate::error::CaptureError;

/// The two sensor streams of an RGB-D device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    /// The depth stream.
    Depth,
    /// The color stream.
    Color,
}

/// Requested parameters for a single sensor stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamConfig {
    /// The frame size in pixels.
    pub size: ImageSize,
    /// The pixel format of the stream.
    pub format: PixelFormat,
    /// The frame rate in frames per second.
    pub fps: u32,
}

/// Stream parameters for a full capture session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// The depth stream parameters.
    pub depth: StreamConfig,
    /// The color stream parameters.
    pub color: StreamConfig,
}

impl SessionConfig {
    /// Check the format pairing required by the alignment pipeline.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.depth.format != PixelFormat::Z16 {
            return Err(CaptureError::InvalidConfig(format!(
                "depth stream must be Z16, got {}",
                self.depth.format
            )));
        }
        if self.color.format != PixelFormat::Rgb8 {
            return Err(CaptureError::InvalidConfig(format!(
                "color stream must be RGB8, got {}",
                self.color.format
            )));
        }
        Ok(())
    }
}

/// A synchronized depth and color frame pair for one acquisition cycle.
///
/// Both frames belong to the same logical instant. The pair is created at the
/// start of a cycle and dropped before the next one begins; nothing in the
/// pipeline retains it.
pub struct FramePair {
    /// The depth frame.
    pub depth: FrameBuffer,
    /// The color frame.
    pub color: FrameBuffer,
}

/// Supplies synchronized depth and color frames, one pair per acquisition cycle.
///
/// Implementations deliver both frames of one logical instant together from
/// [`FrameSource::wait_for_frames`]; the capture session never pairs frames
/// across cycles itself.
pub trait FrameSource {
    /// Register the requested parameters for one stream.
    ///
    /// Called once per stream before [`FrameSource::start`]. A configuration
    /// the source cannot provide is reported here, before streaming begins.
    fn enable_stream(&mut self, kind: StreamKind, config: &StreamConfig)
        -> Result<(), CaptureError>;

    /// Begin delivering frames.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Block until the next synchronized pair is available, at most `timeout`.
    ///
    /// # Errors
    ///
    /// * [`CaptureError::AcquisitionTimeout`] if no pair arrives in time.
    /// * [`CaptureError::EndOfStream`] when a recording is exhausted.
    fn wait_for_frames(&mut self, timeout: Duration) -> Result<FramePair, CaptureError>;

    /// Tear down the acquisition. No further frames are produced.
    fn stop(&mut self) -> Result<(), CaptureError>;
}
