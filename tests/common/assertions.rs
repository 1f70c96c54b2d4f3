//! Assertion utilities for testing.
//!
//! Pixel colors come back from PNG encoding exactly, but blended layers
//! (alpha fills, anti-aliased lines) need a tolerance.

use image::{Rgba, RgbaImage};

/// Default per-channel tolerance for blended pixels
pub const DEFAULT_CHANNEL_TOLERANCE: u8 = 2;

/// Assert that a pixel has the expected color within a per-channel tolerance.
pub fn assert_pixel_near(img: &RgbaImage, x: u32, y: u32, expected: [u8; 4], tolerance: Option<u8>) {
    let tolerance = tolerance.unwrap_or(DEFAULT_CHANNEL_TOLERANCE);
    let actual = img.get_pixel(x, y).0;
    let close = actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance);
    assert!(
        close,
        "Pixel ({}, {}) differs: actual = {:?}, expected = {:?}, tolerance = {}",
        x, y, actual, expected, tolerance
    );
}

/// Assert that a pixel is not white.
pub fn assert_painted(img: &RgbaImage, x: u32, y: u32) {
    let actual = *img.get_pixel(x, y);
    assert_ne!(
        actual,
        Rgba([255, 255, 255, 255]),
        "Pixel ({}, {}) was not painted",
        x,
        y
    );
}

/// Assert that every pixel of a row segment is white.
pub fn assert_blank_row(img: &RgbaImage, y: u32, xs: std::ops::Range<u32>) {
    for x in xs {
        assert_eq!(
            img.get_pixel(x, y).0,
            [255, 255, 255, 255],
            "Pixel ({}, {}) should be blank",
            x,
            y
        );
    }
}

/// Assert that a float is within a closed range.
pub fn assert_in_range(actual: f32, min: f32, max: f32) {
    assert!(
        (min..=max).contains(&actual),
        "Value not in range: actual = {}, min = {}, max = {}",
        actual,
        min,
        max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_pixel_near() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        assert_pixel_near(&img, 1, 1, [101, 99, 100, 255], None);
    }

    #[test]
    #[should_panic]
    fn test_assert_pixel_near_fails() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        assert_pixel_near(&img, 0, 0, [120, 100, 100, 255], None);
    }

    #[test]
    fn test_assert_in_range() {
        assert_in_range(5.0, 0.0, 10.0);
        assert_in_range(10.0, 0.0, 10.0);
    }
}
