//! Image inspection utilities for testing.

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};

/// Decode an encoded chart
pub fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes)
        .expect("Failed to decode image")
        .to_rgba8()
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();
    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }
    Ok(())
}

/// Number of pixels for which `predicate` holds
pub fn count_pixels<F>(img: &RgbaImage, predicate: F) -> usize
where
    F: Fn(&Rgba<u8>) -> bool,
{
    img.pixels().filter(|p| predicate(p)).count()
}

/// Number of pixels that differ from white
pub fn count_painted(img: &RgbaImage) -> usize {
    count_pixels(img, |p| p.0 != [255, 255, 255, 255])
}

/// Number of pixels whose color occurs in `palette`
pub fn count_in_palette(img: &RgbaImage, palette: &[[u8; 4]]) -> usize {
    count_pixels(img, |p| palette.contains(&p.0))
}

/// Number of distinct colors in a rectangle
pub fn distinct_colors(img: &RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let mut colors: Vec<[u8; 4]> = Vec::new();
    for y in y0..y1.min(img.height()) {
        for x in x0..x1.min(img.width()) {
            let c = img.get_pixel(x, y).0;
            if !colors.contains(&c) {
                colors.push(c);
            }
        }
    }
    colors.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_image_format() {
        let img = RgbaImage::new(2, 2);
        let mut png_bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .unwrap();
        assert_eq!(detect_image_format(&png_bytes), Some(ImageFormat::Png));
    }

    #[test]
    fn test_counts() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 2, Rgba([0, 0, 255, 255]));
        assert_eq!(count_painted(&img), 2);
        assert_eq!(count_in_palette(&img, &[[255, 0, 0, 255]]), 1);
        assert_eq!(distinct_colors(&img, 0, 0, 4, 4), 3);
        assert!(assert_image_dimensions(&DynamicImage::ImageRgba8(img), 4, 4).is_ok());
    }
}
