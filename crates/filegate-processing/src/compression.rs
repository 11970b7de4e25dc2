use bytes::Bytes;
use filegate_core::{FileError, FileResult};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::str::FromStr;

/// Lossy encoding level. Only JPEG output honours it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Lightest,
    Lighter,
    #[default]
    Normal,
    Better,
    Best,
}

impl FromStr for QualityPreset {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let preset = match s.trim().to_ascii_lowercase().as_str() {
            "lightest" => QualityPreset::Lightest,
            "lighter" => QualityPreset::Lighter,
            "normal" => QualityPreset::Normal,
            "better" => QualityPreset::Better,
            "best" => QualityPreset::Best,
            _ => {
                return Err(FileError::Processing(format!(
                    "Unknown quality preset '{}'",
                    s
                )))
            }
        };
        Ok(preset)
    }
}

impl QualityPreset {
    /// JPEG encoder quality, 1-100.
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Normal => 75,
            QualityPreset::Better => 85,
            QualityPreset::Best => 95,
            QualityPreset::Lighter => 65,
            QualityPreset::Lightest => 50,
        }
    }
}

/// Output format for re-encoded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl FromStr for OutputFormat {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(FileError::Processing(format!(
                "Cannot encode images as '{}'",
                s
            ))),
        }
    }
}

impl OutputFormat {
    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }

    /// Encodable counterpart of a decoded source format, if there is one.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(OutputFormat::Jpeg),
            ImageFormat::Png => Some(OutputFormat::Png),
            ImageFormat::WebP => Some(OutputFormat::WebP),
            _ => None,
        }
    }
}

/// Image encoder front-end.
pub struct ImageCompressor;

impl ImageCompressor {
    pub fn compress(
        img: &DynamicImage,
        format: OutputFormat,
        quality: QualityPreset,
    ) -> FileResult<Bytes> {
        let encoded = match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img, quality),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img),
        };

        encoded.map_err(|e| {
            FileError::Processing(format!("Failed to encode image as {:?}: {}", format, e))
        })
    }

    /// JPEG has no alpha channel, so the image is flattened to RGB first.
    fn compress_jpeg(img: &DynamicImage, quality: QualityPreset) -> image::ImageResult<Bytes> {
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.jpeg_quality());
        rgb.write_with_encoder(encoder)?;
        Ok(Bytes::from(buffer))
    }

    fn compress_png(img: &DynamicImage) -> image::ImageResult<Bytes> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(Bytes::from(buffer))
    }

    /// WebP output is lossless; quality presets do not apply.
    fn compress_webp(img: &DynamicImage) -> image::ImageResult<Bytes> {
        let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
        let mut buffer = Vec::new();
        rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))?;
        Ok(Bytes::from(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([10, 120, 200, 255])))
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("webp".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
        assert!(matches!(
            "avif".parse::<OutputFormat>(),
            Err(FileError::Processing(_))
        ));
    }

    #[test]
    fn test_parse_quality() {
        assert_eq!("Best".parse::<QualityPreset>().unwrap(), QualityPreset::Best);
        assert!("ultra".parse::<QualityPreset>().is_err());
        assert!(QualityPreset::Best.jpeg_quality() > QualityPreset::Lightest.jpeg_quality());
    }

    #[test]
    fn test_compress_round_trips_through_decoder() {
        let img = test_image();
        for (format, expected) in [
            (OutputFormat::Jpeg, ImageFormat::Jpeg),
            (OutputFormat::Png, ImageFormat::Png),
            (OutputFormat::WebP, ImageFormat::WebP),
        ] {
            let data = ImageCompressor::compress(&img, format, QualityPreset::Normal).unwrap();
            assert_eq!(image::guess_format(&data).unwrap(), expected);

            let decoded = image::load_from_memory(&data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (16, 8));
        }
    }

    #[test]
    fn test_from_image_format() {
        assert_eq!(
            OutputFormat::from_image_format(ImageFormat::Png),
            Some(OutputFormat::Png)
        );
        assert_eq!(OutputFormat::from_image_format(ImageFormat::Gif), None);
    }
}
