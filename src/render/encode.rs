//! Image output formats and encoding.

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use crate::error::{BjerknesError, Result};

/// Raster formats charts can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Format named by a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| BjerknesError::InvalidParameter {
                param: "output".to_string(),
                message: format!("{} has no file extension", path.display()),
            })?;
        ext.parse()
    }
}

impl FromStr for OutputFormat {
    type Err = BjerknesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            other => Err(BjerknesError::InvalidParameter {
                param: "format".to_string(),
                message: format!("unsupported image format '{}', use png or jpeg", other),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// Encode an image; JPEG drops the alpha channel.
pub fn encode_image(img: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => img.write_to(&mut buffer, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            rgb.write_to(&mut buffer, ImageFormat::Jpeg)?;
        }
    }
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert!(matches!(
            "gif".parse::<OutputFormat>(),
            Err(BjerknesError::InvalidParameter { .. })
        ));
        assert_eq!(
            OutputFormat::from_path(Path::new("out/chart.jpeg")).unwrap(),
            OutputFormat::Jpeg
        );
        assert!(OutputFormat::from_path(Path::new("chart")).is_err());
    }

    #[test]
    fn test_encode_signatures() {
        let img = RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        let png = encode_image(&img, OutputFormat::Png).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        let jpeg = encode_image(&img, OutputFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
