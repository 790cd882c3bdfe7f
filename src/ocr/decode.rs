use image::{ImageFormat, RgbImage};

use crate::error::DecodeError;

/// Decodes uploaded PNG or JPEG bytes into an RGB8 buffer.
///
/// Other formats are rejected even when the image crate could read them.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat)?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(DecodeError::UnsupportedFormat);
    }

    let img = image::load_from_memory_with_format(bytes, format)?;
    Ok(img.to_rgb8())
}
