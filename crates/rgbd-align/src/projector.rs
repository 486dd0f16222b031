use rayon::prelude::*;

use rgbd_image::{FrameBuffer, PixelFormat};

use crate::{
    calibration::RigCalibration,
    error::ProjectionError,
    uvmap::{UvMap, INVALID_UV},
};

/// Produces the per-depth-pixel UV correspondence map for a depth frame.
///
/// The capture loop is generic over this trait so that recorded or synthetic
/// correspondence data can stand in for the projection math in tests.
pub trait UvMapSource {
    /// Compute the UV map for one depth frame.
    ///
    /// The returned map has exactly one entry per depth pixel, row-major in
    /// the depth grid.
    fn query_uv_map(&self, depth: &FrameBuffer) -> Result<UvMap, ProjectionError>;
}

/// Pinhole projection oracle mapping depth pixels into the color image.
///
/// For every depth pixel the projector deprojects the measured point through
/// the depth intrinsics, moves it into the color frame with the rig
/// extrinsics and projects it through the color intrinsics. The result is
/// normalized against the color resolution; pixels with no depth reading,
/// points behind the color sensor and points outside its field of view map
/// to [`INVALID_UV`].
pub struct PinholeProjector {
    calib: RigCalibration,
}

impl PinholeProjector {
    /// Create a projector from an immutable rig calibration.
    pub fn new(calib: RigCalibration) -> Self {
        Self { calib }
    }

    /// Get the rig calibration the projector was built from.
    pub fn calibration(&self) -> &RigCalibration {
        &self.calib
    }

    fn project_pixel(&self, x: usize, y: usize, raw_depth: u16) -> [f32; 2] {
        if raw_depth == 0 {
            return INVALID_UV;
        }
        let z = raw_depth as f64 * self.calib.depth_scale;

        // deproject through the depth intrinsics
        let din = &self.calib.depth;
        let point = [
            (x as f64 - din.cx) / din.fx * z,
            (y as f64 - din.cy) / din.fy * z,
            z,
        ];

        // move the point into the color frame
        let point = self.calib.depth_to_color.transform(point);
        if point[2] <= 0.0 {
            return INVALID_UV;
        }

        // project through the color intrinsics and normalize
        let cin = &self.calib.color;
        let u = ((point[0] / point[2]) * cin.fx + cin.cx) / self.calib.color_size.width as f64;
        let v = ((point[1] / point[2]) * cin.fy + cin.cy) / self.calib.color_size.height as f64;

        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return INVALID_UV;
        }

        [u as f32, v as f32]
    }
}

impl UvMapSource for PinholeProjector {
    fn query_uv_map(&self, depth: &FrameBuffer) -> Result<UvMap, ProjectionError> {
        if depth.format() != PixelFormat::Z16 {
            return Err(ProjectionError::UnsupportedFormat(
                depth.format(),
                PixelFormat::Z16,
            ));
        }

        let size = depth.size();
        let mut data = vec![INVALID_UV; size.num_pixels()];

        data.par_chunks_exact_mut(size.width)
            .enumerate()
            .for_each(|(y, uv_row)| {
                let Some(depth_row) = depth.row(y) else {
                    return;
                };
                depth_row
                    .chunks_exact(2)
                    .zip(uv_row.iter_mut())
                    .enumerate()
                    .for_each(|(x, (bytes, uv))| {
                        let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
                        *uv = self.project_pixel(x, y, raw);
                    });
            });

        Ok(UvMap::new(size, data)?)
    }
}
