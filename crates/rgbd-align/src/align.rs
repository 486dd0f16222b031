use rayon::prelude::*;

use rgbd_image::{FrameBuffer, Image, PixelFormat};

use crate::{error::AlignError, uvmap::UvMap};

/// Marker color written for depth pixels with no valid color correspondence.
///
/// Pure blue is visually distinct from captured scene content, which makes
/// unobserved regions easy to spot in the aligned output.
pub const FALLBACK_PIXEL: [u8; 3] = [0, 0, 255];

/// Resample a color frame onto the depth sensor's pixel grid.
///
/// For every depth pixel the UV map names the normalized color image
/// coordinate observing the same 3-D point; the nearest color sample is
/// copied into the output in R,G,B order. Depth pixels whose pair carries a
/// negative component, or whose coordinate lands outside the color image
/// (including `u` or `v` equal to exactly 1.0), receive [`FALLBACK_PIXEL`].
/// Rows are written top-to-bottom in depth grid order; no vertical flip is
/// applied.
///
/// The color buffer is only read and never retained; `dst` is fully
/// overwritten on success and the call has no other side effects.
///
/// # Arguments
///
/// * `uv_map` - The correspondence map computed from the depth frame of the
///   same acquisition cycle.
/// * `color` - The raw RGB8 color frame of the same cycle.
/// * `dst` - The output image, sized to the depth grid.
///
/// # Errors
///
/// * The color frame must be RGB8.
/// * The output image must have the same size as the UV map grid.
pub fn align_color_to_depth(
    uv_map: &UvMap,
    color: &FrameBuffer,
    dst: &mut Image<u8, 3>,
) -> Result<(), AlignError> {
    if color.format() != PixelFormat::Rgb8 {
        return Err(AlignError::UnsupportedFormat(
            color.format(),
            PixelFormat::Rgb8,
        ));
    }
    if dst.size() != uv_map.size() {
        return Err(AlignError::SizeMismatch(dst.size(), uv_map.size()));
    }

    let (color_width, color_height) = (color.width(), color.height());
    let color_bytes = color.as_bytes();
    let pitch = color.pitch();
    let cols = uv_map.size().width;

    dst.as_slice_mut()
        .par_chunks_exact_mut(3 * cols)
        .zip(uv_map.as_slice().par_chunks_exact(cols))
        .for_each(|(dst_row, uv_row)| {
            dst_row
                .chunks_exact_mut(3)
                .zip(uv_row.iter())
                .for_each(|(dst_pixel, &[u, v])| {
                    dst_pixel.copy_from_slice(&sample_color(
                        u,
                        v,
                        color_bytes,
                        color_width,
                        color_height,
                        pitch,
                    ));
                });
        });

    Ok(())
}

/// Fetch the nearest color sample for one normalized coordinate pair.
///
/// The multiply runs in f64 so a `u` just below 1.0 cannot round up to the
/// image width before the bounds check.
#[inline]
fn sample_color(
    u: f32,
    v: f32,
    color_bytes: &[u8],
    color_width: usize,
    color_height: usize,
    pitch: usize,
) -> [u8; 3] {
    if u < 0.0 || v < 0.0 {
        return FALLBACK_PIXEL;
    }

    let i = (u as f64 * color_width as f64).floor() as usize;
    let j = (v as f64 * color_height as f64).floor() as usize;
    if i >= color_width || j >= color_height {
        return FALLBACK_PIXEL;
    }

    let offset = j * pitch + 3 * i;
    [
        color_bytes[offset],
        color_bytes[offset + 1],
        color_bytes[offset + 2],
    ]
}

#[cfg(test)]
mod tests {
    use super::{align_color_to_depth, FALLBACK_PIXEL};
    use crate::{error::AlignError, uvmap::UvMap};
    use rgbd_image::{FrameBuffer, Image, ImageError, ImageSize, PixelFormat};
    use std::time::Duration;

    fn solid_color_frame(size: ImageSize, rgb: [u8; 3]) -> FrameBuffer {
        let data = rgb.repeat(size.num_pixels());
        FrameBuffer::new_packed(size, PixelFormat::Rgb8, data, Duration::ZERO, 0).unwrap()
    }

    #[test]
    fn output_size_matches_depth_grid() -> Result<(), AlignError> {
        let depth_size = ImageSize {
            width: 5,
            height: 3,
        };
        let color = solid_color_frame(
            ImageSize {
                width: 8,
                height: 8,
            },
            [1, 2, 3],
        );
        let uv_map = UvMap::from_size_val(depth_size, [0.5, 0.5]);

        let mut aligned = Image::from_size_val(depth_size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &color, &mut aligned)?;

        assert_eq!(aligned.as_slice().len(), 5 * 3 * 3);

        Ok(())
    }

    #[test]
    fn invalid_correspondence_writes_fallback() -> Result<(), AlignError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let color = solid_color_frame(size, [10, 20, 30]);
        let uv_map = UvMap::new(size, vec![[-1.0, -1.0], [0.0, 0.0]]).unwrap();

        let mut aligned = Image::from_size_val(size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &color, &mut aligned)?;

        assert_eq!(&aligned.as_slice()[0..3], &FALLBACK_PIXEL);
        assert_eq!(&aligned.as_slice()[3..6], &[10, 20, 30]);

        Ok(())
    }

    #[test]
    fn boundary_coordinates_write_fallback() -> Result<(), AlignError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let color = solid_color_frame(
            ImageSize {
                width: 16,
                height: 16,
            },
            [200, 100, 50],
        );
        // exactly 1.0 in either component must not index past the color image
        let uv_map = UvMap::new(
            size,
            vec![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.999_999, 0.999_999]],
        )
        .unwrap();

        let mut aligned = Image::from_size_val(size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &color, &mut aligned)?;

        assert_eq!(&aligned.as_slice()[0..3], &FALLBACK_PIXEL);
        assert_eq!(&aligned.as_slice()[3..6], &FALLBACK_PIXEL);
        assert_eq!(&aligned.as_slice()[6..9], &FALLBACK_PIXEL);
        assert_eq!(&aligned.as_slice()[9..12], &[200, 100, 50]);

        Ok(())
    }

    #[test]
    fn solid_color_survives_resampling() -> Result<(), AlignError> {
        let depth_size = ImageSize {
            width: 4,
            height: 2,
        };
        let color = solid_color_frame(
            ImageSize {
                width: 2,
                height: 2,
            },
            [255, 0, 0],
        );
        // pixels 2 and 7 carry no correspondence
        let uv_map = UvMap::new(
            depth_size,
            vec![
                [0.0, 0.0],
                [0.5, 0.0],
                [-1.0, -1.0],
                [0.9, 0.9],
                [0.0, 0.5],
                [0.5, 0.5],
                [0.99, 0.99],
                [-1.0, -1.0],
            ],
        )
        .unwrap();

        let mut aligned = Image::from_size_val(depth_size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &color, &mut aligned)?;

        for p in [0, 1, 3, 4, 5, 6] {
            assert_eq!(&aligned.as_slice()[3 * p..3 * p + 3], &[255, 0, 0], "{p}");
        }
        for p in [2, 7] {
            assert_eq!(&aligned.as_slice()[3 * p..3 * p + 3], &FALLBACK_PIXEL, "{p}");
        }

        Ok(())
    }

    #[test]
    fn samples_nearest_pixel_from_padded_rows() -> Result<(), AlignError> {
        // 2x2 color frame with 2 bytes of row padding
        let color_size = ImageSize {
            width: 2,
            height: 2,
        };
        let data = vec![
            1, 1, 1, 2, 2, 2, 0xaa, 0xaa, // row 0 + padding
            3, 3, 3, 4, 4, 4, 0xaa, 0xaa, // row 1 + padding
        ];
        let color =
            FrameBuffer::new(color_size, PixelFormat::Rgb8, 8, data, Duration::ZERO, 0).unwrap();

        let depth_size = ImageSize {
            width: 2,
            height: 2,
        };
        let uv_map = UvMap::new(
            depth_size,
            vec![[0.0, 0.0], [0.5, 0.0], [0.0, 0.5], [0.5, 0.5]],
        )
        .unwrap();

        let mut aligned = Image::from_size_val(depth_size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &color, &mut aligned)?;

        assert_eq!(
            aligned.as_slice(),
            &[1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]
        );

        Ok(())
    }

    #[test]
    fn distinct_color_frames_only_change_observed_pixels() -> Result<(), AlignError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let uv_map = UvMap::new(size, vec![[0.0, 0.0], [-1.0, -1.0]]).unwrap();

        let mut first = Image::from_size_val(size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &solid_color_frame(size, [9, 9, 9]), &mut first)?;

        let mut second = Image::from_size_val(size, 0u8).unwrap();
        align_color_to_depth(&uv_map, &solid_color_frame(size, [7, 7, 7]), &mut second)?;

        assert_ne!(&first.as_slice()[0..3], &second.as_slice()[0..3]);
        assert_eq!(&first.as_slice()[3..6], &second.as_slice()[3..6]);
        assert_eq!(&first.as_slice()[3..6], &FALLBACK_PIXEL);

        Ok(())
    }

    #[test]
    fn rejects_non_color_frame() {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let depth =
            FrameBuffer::new_packed(size, PixelFormat::Z16, vec![0u8; 8], Duration::ZERO, 0)
                .unwrap();
        let uv_map = UvMap::from_size_val(size, [0.0, 0.0]);
        let mut aligned = Image::from_size_val(size, 0u8).unwrap();

        assert!(matches!(
            align_color_to_depth(&uv_map, &depth, &mut aligned),
            Err(AlignError::UnsupportedFormat(
                PixelFormat::Z16,
                PixelFormat::Rgb8
            ))
        ));
    }

    #[test]
    fn rejects_mismatched_output_size() -> Result<(), ImageError> {
        let color = solid_color_frame(
            ImageSize {
                width: 2,
                height: 2,
            },
            [0, 0, 0],
        );
        let uv_map = UvMap::from_size_val(
            ImageSize {
                width: 4,
                height: 2,
            },
            [0.0, 0.0],
        );
        let mut aligned = Image::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            0u8,
        )?;

        assert!(matches!(
            align_color_to_depth(&uv_map, &color, &mut aligned),
            Err(AlignError::SizeMismatch(_, _))
        ));

        Ok(())
    }
}
