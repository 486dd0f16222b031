use std::{collections::VecDeque, fs, path::Path, time::Duration};

use rgbd_image::FrameBuffer;

use crate::{
    error::CaptureError,
    source::{FramePair, FrameSource, StreamConfig, StreamKind},
};

/// Replays a recorded depth + color capture as a [`FrameSource`].
///
/// The recording either lives in memory ([`PlaybackSource::from_frames`]) or
/// in a raw file of interleaved frame pairs ([`PlaybackSource::open`]). Each
/// call to [`FrameSource::wait_for_frames`] returns the next pair immediately;
/// an exhausted recording reports [`CaptureError::EndOfStream`].
pub struct PlaybackSource {
    depth_config: StreamConfig,
    color_config: StreamConfig,
    frames: VecDeque<FramePair>,
    depth_enabled: bool,
    color_enabled: bool,
    streaming: bool,
}

impl PlaybackSource {
    /// Create a playback source over an in-memory recording.
    ///
    /// # Errors
    ///
    /// If any recorded frame disagrees with the recording's stream parameters,
    /// an error is returned.
    pub fn from_frames(
        depth: StreamConfig,
        color: StreamConfig,
        frames: Vec<FramePair>,
    ) -> Result<Self, CaptureError> {
        for (i, pair) in frames.iter().enumerate() {
            if pair.depth.size() != depth.size || pair.depth.format() != depth.format {
                return Err(CaptureError::InvalidConfig(format!(
                    "recorded depth frame {} is {} {}, recording declares {} {}",
                    i,
                    pair.depth.size(),
                    pair.depth.format(),
                    depth.size,
                    depth.format
                )));
            }
            if pair.color.size() != color.size || pair.color.format() != color.format {
                return Err(CaptureError::InvalidConfig(format!(
                    "recorded color frame {} is {} {}, recording declares {} {}",
                    i,
                    pair.color.size(),
                    pair.color.format(),
                    color.size,
                    color.format
                )));
            }
        }

        Ok(Self {
            depth_config: depth,
            color_config: color,
            frames: frames.into(),
            depth_enabled: false,
            color_enabled: false,
            streaming: false,
        })
    }

    /// Open a raw recorded capture file.
    ///
    /// The file holds interleaved packed frame pairs (one depth frame followed
    /// by one color frame per cycle) with no header; the frame geometry comes
    /// entirely from the stream parameters. Timestamps are synthesized from
    /// the configured depth frame rate.
    ///
    /// # Errors
    ///
    /// If the file length is not a whole number of frame pairs for the given
    /// parameters, an error is returned before streaming starts.
    pub fn open(
        path: impl AsRef<Path>,
        depth: StreamConfig,
        color: StreamConfig,
    ) -> Result<Self, CaptureError> {
        let bytes = fs::read(path.as_ref())?;

        let depth_len = depth.size.num_pixels() * depth.format.bytes_per_pixel();
        let color_len = color.size.num_pixels() * color.format.bytes_per_pixel();
        let cycle_len = depth_len + color_len;

        if bytes.is_empty() || bytes.len() % cycle_len != 0 {
            return Err(CaptureError::InvalidConfig(format!(
                "recording {} is {} bytes, not a whole number of {} byte frame pairs",
                path.as_ref().display(),
                bytes.len(),
                cycle_len
            )));
        }

        let fps = depth.fps.max(1);
        let mut frames = VecDeque::with_capacity(bytes.len() / cycle_len);
        for (i, chunk) in bytes.chunks_exact(cycle_len).enumerate() {
            let timestamp = Duration::from_secs_f64(i as f64 / fps as f64);
            let sequence = i as u32;
            frames.push_back(FramePair {
                depth: FrameBuffer::new_packed(
                    depth.size,
                    depth.format,
                    chunk[..depth_len].to_vec(),
                    timestamp,
                    sequence,
                )?,
                color: FrameBuffer::new_packed(
                    color.size,
                    color.format,
                    chunk[depth_len..].to_vec(),
                    timestamp,
                    sequence,
                )?,
            });
        }

        log::info!(
            "opened recording {} with {} frame pairs",
            path.as_ref().display(),
            frames.len()
        );

        Ok(Self {
            depth_config: depth,
            color_config: color,
            frames,
            depth_enabled: false,
            color_enabled: false,
            streaming: false,
        })
    }

    /// Get the number of frame pairs left in the recording.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for PlaybackSource {
    fn enable_stream(
        &mut self,
        kind: StreamKind,
        config: &StreamConfig,
    ) -> Result<(), CaptureError> {
        let recorded = match kind {
            StreamKind::Depth => &self.depth_config,
            StreamKind::Color => &self.color_config,
        };
        if config != recorded {
            return Err(CaptureError::InvalidConfig(format!(
                "requested {:?} stream {:?} does not match the recording {:?}",
                kind, config, recorded
            )));
        }

        match kind {
            StreamKind::Depth => self.depth_enabled = true,
            StreamKind::Color => self.color_enabled = true,
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        if !self.depth_enabled {
            return Err(CaptureError::StreamNotEnabled(StreamKind::Depth));
        }
        if !self.color_enabled {
            return Err(CaptureError::StreamNotEnabled(StreamKind::Color));
        }
        self.streaming = true;
        Ok(())
    }

    fn wait_for_frames(&mut self, _timeout: Duration) -> Result<FramePair, CaptureError> {
        if !self.streaming {
            return Err(CaptureError::SourceNotStarted);
        }
        // playback never blocks; the next pair is either there or the
        // recording is over
        self.frames.pop_front().ok_or(CaptureError::EndOfStream)
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.streaming = false;
        Ok(())
    }
}
