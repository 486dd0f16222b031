use std::path::{Path, PathBuf};

use rgbd_image::{FrameBuffer, Image};

use crate::{error::CaptureError, png::write_image_png_rgb8};

/// The output of one completed acquisition cycle.
pub struct CaptureCycle<'a> {
    /// Zero-based cycle index within the session run.
    pub index: usize,
    /// The raw color frame at native resolution.
    pub color: &'a FrameBuffer,
    /// The color image resampled onto the depth grid.
    pub aligned: &'a Image<u8, 3>,
}

/// Receives the output of each completed acquisition cycle.
///
/// The sink owns whatever it does with the data; the session only guarantees
/// that a cycle handed over here is complete (the aligned image is fully
/// written, never partial).
pub trait FrameSink {
    /// Persist or forward one cycle's output.
    fn write(&mut self, cycle: &CaptureCycle<'_>) -> Result<(), CaptureError>;
}

/// Persists each cycle as a pair of PNG files in a directory.
///
/// Files are named `<tag>_color_<index>.png` (native color resolution) and
/// `<tag>_aligned_<index>.png` (depth resolution).
pub struct PngDirSink {
    dir: PathBuf,
    tag: String,
}

impl PngDirSink {
    /// Create a sink writing into `dir` with the given file name tag.
    pub fn new(dir: impl AsRef<Path>, tag: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            tag: tag.to_string(),
        }
    }
}

impl FrameSink for PngDirSink {
    fn write(&mut self, cycle: &CaptureCycle<'_>) -> Result<(), CaptureError> {
        let color_path = self
            .dir
            .join(format!("{}_color_{}.png", self.tag, cycle.index));
        write_image_png_rgb8(&color_path, &cycle.color.to_rgb8_image()?)?;

        let aligned_path = self
            .dir
            .join(format!("{}_aligned_{}.png", self.tag, cycle.index));
        write_image_png_rgb8(&aligned_path, cycle.aligned)?;

        log::debug!(
            "wrote cycle {} to {} and {}",
            cycle.index,
            color_path.display(),
            aligned_path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CaptureCycle, FrameSink, PngDirSink};
    use rgbd_image::{FrameBuffer, Image, ImageSize, PixelFormat};
    use std::time::Duration;

    #[test]
    fn writes_png_pair_per_cycle() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut sink = PngDirSink::new(dir.path(), "test");

        let color_size = ImageSize {
            width: 4,
            height: 2,
        };
        let color = FrameBuffer::new_packed(
            color_size,
            PixelFormat::Rgb8,
            vec![128u8; color_size.num_pixels() * 3],
            Duration::ZERO,
            0,
        )?;
        let aligned = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0u8,
        )?;

        sink.write(&CaptureCycle {
            index: 3,
            color: &color,
            aligned: &aligned,
        })?;

        assert!(dir.path().join("test_color_3.png").exists());
        assert!(dir.path().join("test_aligned_3.png").exists());

        Ok(())
    }
}
