use std::time::Duration;

use crate::{session::SessionState, source::StreamKind};

/// An error type for capture sessions and frame sources.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    /// The stream configuration is inconsistent with what the source provides.
    #[error("Invalid stream configuration: {0}")]
    InvalidConfig(String),

    /// A stream required by the session was never enabled.
    #[error("The {0:?} stream was not enabled")]
    StreamNotEnabled(StreamKind),

    /// Frames were requested from a source that is not streaming.
    #[error("The source is not streaming")]
    SourceNotStarted,

    /// No synchronized frame pair arrived within the timeout.
    #[error("Timed out after {0:?} waiting for synchronized frames")]
    AcquisitionTimeout(Duration),

    /// The recorded capture has no more frames.
    #[error("End of recorded stream")]
    EndOfStream,

    /// A lifecycle method was called in the wrong session state.
    #[error("Session is {actual:?}, expected {expected:?}")]
    InvalidState {
        /// The state the method requires.
        expected: SessionState,
        /// The state the session is in.
        actual: SessionState,
    },

    /// Failed to create an image or frame container.
    #[error(transparent)]
    Image(#[from] rgbd_image::ImageError),

    /// UV-map generation failed.
    #[error(transparent)]
    Projection(#[from] rgbd_align::ProjectionError),

    /// Alignment resampling failed.
    #[error(transparent)]
    Align(#[from] rgbd_align::AlignError),

    /// File access failed.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),
}
