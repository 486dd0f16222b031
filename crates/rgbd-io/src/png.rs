use std::{fs::File, io::BufWriter, path::Path};

use png::{BitDepth, ColorType, Encoder};
use rgbd_image::{Image, ImageSize};

use crate::error::CaptureError;

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), CaptureError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgb,
    )
}

// utility function to write the png file
fn write_png_impl(
    file_path: impl AsRef<Path>,
    data: &[u8],
    size: ImageSize,
    bit_depth: BitDepth,
    color_type: ColorType,
) -> Result<(), CaptureError> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);

    let mut encoder = Encoder::new(writer, size.width as u32, size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| CaptureError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(data)
        .map_err(|e| CaptureError::PngEncodingError(e.to_string()))?;

    Ok(())
}
