use image::{GrayImage, Luma, RgbImage};

/// Converts image to binary by keeping only bright pixels.
///
/// Pixels where R > threshold AND G > threshold AND B > threshold become black (text).
/// All other pixels become white (background).
///
/// Result screens draw counts in white over colored panels, so this strips
/// most of the decoration before OCR.
pub fn threshold_bright_pixels(img: &RgbImage, threshold: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;

        let value = if r > threshold && g > threshold && b > threshold {
            0u8 // Black (text)
        } else {
            255u8 // White (background)
        };

        output.put_pixel(x, y, Luma([value]));
    }

    output
}

/// Produces the grayscale image handed to the OCR engine.
///
/// Without a threshold this is a plain luminance conversion.
pub fn prepare_for_ocr(img: &RgbImage, threshold: Option<u8>) -> GrayImage {
    match threshold {
        Some(t) => threshold_bright_pixels(img, t),
        None => image::imageops::grayscale(img),
    }
}
