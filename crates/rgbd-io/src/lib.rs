#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for capture and I/O operations.
///
/// Defines [`error::CaptureError`] variants for configuration, acquisition,
/// session lifecycle and file export failures.
pub mod error;

/// Frame pacing measurement during streaming.
pub mod interval;

/// Recorded-capture playback sources.
///
/// Replays depth + color frame pairs from memory or from a raw interleaved
/// file. See [`playback::PlaybackSource`].
pub mod playback;

/// PNG image encoding.
pub mod png;

/// Capture session state machine.
///
/// Drives the acquisition / projection / alignment / emit cycle over a frame
/// source. See [`session::CaptureSession`].
pub mod session;

/// Output sinks receiving per-cycle results.
pub mod sink;

/// Stream configuration and the frame source abstraction.
pub mod source;
