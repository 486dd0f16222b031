use std::time::Duration;

use rgbd_align::{align_color_to_depth, UvMapSource};
use rgbd_image::Image;

use crate::{
    error::CaptureError,
    interval::FrameInterval,
    sink::{CaptureCycle, FrameSink},
    source::{FrameSource, SessionConfig, StreamKind},
};

/// Lifecycle states of a capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No streams registered yet.
    Idle,
    /// Streams registered and the correspondence oracle installed.
    Configured,
    /// Frames are being acquired.
    Streaming,
    /// Acquisition torn down; the session is finished.
    Stopped,
}

/// Default wait for a synchronized frame pair.
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Drives the acquisition, projection, alignment and emit cycle over a frame
/// source.
///
/// The session walks `Idle -> Configured -> Streaming -> Stopped`. While
/// streaming, each cycle blocks for the next synchronized depth + color pair,
/// asks the oracle for the UV map of that depth frame, resamples the color
/// frame onto the depth grid into a freshly allocated image and hands both the
/// raw color frame and the aligned image to the sink. Everything runs on the
/// calling thread; a cycle's output derives only from that cycle's frames.
pub struct CaptureSession<S: FrameSource, O: UvMapSource> {
    source: S,
    oracle: Option<O>,
    state: SessionState,
    frame_timeout: Duration,
    interval: FrameInterval,
}

impl<S: FrameSource, O: UvMapSource> CaptureSession<S, O> {
    /// Create an idle session over a frame source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            oracle: None,
            state: SessionState::Idle,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
            interval: FrameInterval::new(),
        }
    }

    /// Set the per-cycle acquisition timeout.
    pub fn with_frame_timeout(mut self, timeout: Duration) -> Self {
        self.frame_timeout = timeout;
        self
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Register the stream parameters and install the correspondence oracle.
    ///
    /// The oracle is built once from the rig calibration by the caller; the
    /// calibration is fixed from this point for the rest of the session.
    ///
    /// # Errors
    ///
    /// If the configuration is rejected by [`SessionConfig::validate`] or by
    /// the source, the session stays idle and the error is surfaced before
    /// streaming starts.
    pub fn configure(&mut self, config: &SessionConfig, oracle: O) -> Result<(), CaptureError> {
        self.expect_state(SessionState::Idle)?;
        config.validate()?;

        self.source.enable_stream(StreamKind::Depth, &config.depth)?;
        self.source.enable_stream(StreamKind::Color, &config.color)?;
        self.oracle = Some(oracle);
        self.state = SessionState::Configured;

        log::info!(
            "session configured: depth {} {}, color {} {}",
            config.depth.size,
            config.depth.format,
            config.color.size,
            config.color.format
        );
        Ok(())
    }

    /// Begin acquisition.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.expect_state(SessionState::Configured)?;
        self.source.start()?;
        self.state = SessionState::Streaming;
        log::info!("session streaming");
        Ok(())
    }

    /// Run up to `max_frames` acquisition cycles, handing each result to the
    /// sink.
    ///
    /// Returns the number of completed cycles. Reaching the end of a recording
    /// ends the run early and cleanly; everything already handed to the sink
    /// stays valid. Acquisition timeouts and all other failures propagate as
    /// errors, and the cycle they interrupt is never emitted.
    pub fn run<K: FrameSink>(
        &mut self,
        sink: &mut K,
        max_frames: usize,
    ) -> Result<usize, CaptureError> {
        self.expect_state(SessionState::Streaming)?;

        for index in 0..max_frames {
            let pair = match self.source.wait_for_frames(self.frame_timeout) {
                Ok(pair) => pair,
                Err(CaptureError::EndOfStream) => {
                    log::info!("recording exhausted after {index} cycles");
                    return Ok(index);
                }
                Err(e) => return Err(e),
            };

            let Some(oracle) = self.oracle.as_ref() else {
                return Err(CaptureError::InvalidState {
                    expected: SessionState::Streaming,
                    actual: self.state,
                });
            };
            let uv_map = oracle.query_uv_map(&pair.depth)?;

            let mut aligned = Image::from_size_val(pair.depth.size(), 0u8)?;
            align_color_to_depth(&uv_map, &pair.color, &mut aligned)?;

            sink.write(&CaptureCycle {
                index,
                color: &pair.color,
                aligned: &aligned,
            })?;

            self.interval.tick();
            match self.interval.rate() {
                Some(rate) => log::debug!("cycle {index} complete ({rate:.1} cycles/s)"),
                None => log::debug!("cycle {index} complete"),
            }
        }

        Ok(max_frames)
    }

    /// Tear down acquisition. The session cannot be restarted.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        self.expect_state(SessionState::Streaming)?;
        self.source.stop()?;
        self.state = SessionState::Stopped;
        log::info!("session stopped");
        Ok(())
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), CaptureError> {
        if self.state != expected {
            return Err(CaptureError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureSession, SessionState};
    use crate::{
        error::CaptureError,
        playback::PlaybackSource,
        sink::{CaptureCycle, FrameSink},
        source::{FramePair, SessionConfig, StreamConfig},
    };
    use rgbd_align::{ProjectionError, UvMap, UvMapSource, FALLBACK_PIXEL};
    use rgbd_image::{FrameBuffer, ImageSize, PixelFormat};
    use std::time::Duration;

    const DEPTH_SIZE: ImageSize = ImageSize {
        width: 2,
        height: 2,
    };
    const COLOR_SIZE: ImageSize = ImageSize {
        width: 2,
        height: 2,
    };

    // hands back a fixed map: three pixels sample the color origin, the
    // last one has no correspondence
    struct FixedUvMap;

    impl UvMapSource for FixedUvMap {
        fn query_uv_map(&self, depth: &FrameBuffer) -> Result<UvMap, ProjectionError> {
            Ok(UvMap::new(
                depth.size(),
                vec![[0.0, 0.0], [0.0, 0.0], [0.0, 0.0], [-1.0, -1.0]],
            )?)
        }
    }

    #[derive(Default)]
    struct CollectSink {
        cycles: Vec<(usize, u32, Vec<u8>)>,
    }

    impl FrameSink for CollectSink {
        fn write(&mut self, cycle: &CaptureCycle<'_>) -> Result<(), CaptureError> {
            self.cycles.push((
                cycle.index,
                cycle.color.sequence(),
                cycle.aligned.as_slice().to_vec(),
            ));
            Ok(())
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            depth: StreamConfig {
                size: DEPTH_SIZE,
                format: PixelFormat::Z16,
                fps: 30,
            },
            color: StreamConfig {
                size: COLOR_SIZE,
                format: PixelFormat::Rgb8,
                fps: 30,
            },
        }
    }

    fn pair(sequence: u32, red: u8) -> FramePair {
        let timestamp = Duration::from_millis(sequence as u64 * 33);
        FramePair {
            depth: FrameBuffer::new_packed(
                DEPTH_SIZE,
                PixelFormat::Z16,
                vec![100, 0, 100, 0, 100, 0, 100, 0],
                timestamp,
                sequence,
            )
            .unwrap(),
            color: FrameBuffer::new_packed(
                COLOR_SIZE,
                PixelFormat::Rgb8,
                [red, 0, 0].repeat(COLOR_SIZE.num_pixels()),
                timestamp,
                sequence,
            )
            .unwrap(),
        }
    }

    fn source(frames: Vec<FramePair>) -> PlaybackSource {
        let config = config();
        PlaybackSource::from_frames(config.depth, config.color, frames).unwrap()
    }

    #[test]
    fn session_lifecycle() -> Result<(), CaptureError> {
        let mut session = CaptureSession::new(source(vec![pair(0, 255)]));
        assert_eq!(session.state(), SessionState::Idle);

        session.configure(&config(), FixedUvMap)?;
        assert_eq!(session.state(), SessionState::Configured);

        session.start()?;
        assert_eq!(session.state(), SessionState::Streaming);

        session.stop()?;
        assert_eq!(session.state(), SessionState::Stopped);

        Ok(())
    }

    #[test]
    fn start_before_configure_fails() {
        let mut session: CaptureSession<_, FixedUvMap> = CaptureSession::new(source(vec![]));
        assert!(matches!(
            session.start(),
            Err(CaptureError::InvalidState {
                expected: SessionState::Configured,
                actual: SessionState::Idle,
            })
        ));
    }

    #[test]
    fn configure_rejects_bad_format_pairing() {
        let mut session = CaptureSession::new(source(vec![]));
        let mut bad = config();
        bad.depth.format = PixelFormat::Rgb8;

        assert!(matches!(
            session.configure(&bad, FixedUvMap),
            Err(CaptureError::InvalidConfig(_))
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn run_emits_one_aligned_cycle_per_pair() -> Result<(), CaptureError> {
        let mut session = CaptureSession::new(source(vec![pair(0, 255), pair(1, 128)]));
        session.configure(&config(), FixedUvMap)?;
        session.start()?;

        let mut sink = CollectSink::default();
        let produced = session.run(&mut sink, 2)?;
        session.stop()?;

        assert_eq!(produced, 2);
        assert_eq!(sink.cycles.len(), 2);

        // cycle n carries cycle n's color frame only
        let (index, sequence, aligned) = &sink.cycles[0];
        assert_eq!((*index, *sequence), (0, 0));
        assert_eq!(&aligned[0..3], &[255, 0, 0]);
        assert_eq!(&aligned[9..12], &FALLBACK_PIXEL);

        let (index, sequence, aligned) = &sink.cycles[1];
        assert_eq!((*index, *sequence), (1, 1));
        assert_eq!(&aligned[0..3], &[128, 0, 0]);
        assert_eq!(&aligned[9..12], &FALLBACK_PIXEL);

        Ok(())
    }

    #[test]
    fn run_ends_cleanly_at_end_of_recording() -> Result<(), CaptureError> {
        let mut session = CaptureSession::new(source(vec![pair(0, 255)]));
        session.configure(&config(), FixedUvMap)?;
        session.start()?;

        let mut sink = CollectSink::default();
        let produced = session.run(&mut sink, 10)?;

        assert_eq!(produced, 1);
        assert_eq!(sink.cycles.len(), 1);

        Ok(())
    }
}
