use filegate_core::{FileError, FileResult};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};

/// Bounding box for a resize. A missing side is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeDimensions {
    /// Parse dimensions from string format: "WxH", "Wx", or "xH"
    pub fn parse(s: &str) -> FileResult<Self> {
        let (width, height) = s.split_once('x').ok_or_else(|| {
            FileError::Processing("Invalid dimensions format. Expected: WxH, Wx, or xH".to_string())
        })?;

        let dimensions = ResizeDimensions {
            width: parse_side(width, "width")?,
            height: parse_side(height, "height")?,
        };

        if dimensions.width.is_none() && dimensions.height.is_none() {
            return Err(FileError::Processing(
                "At least one dimension must be specified".to_string(),
            ));
        }

        Ok(dimensions)
    }
}

fn parse_side(value: &str, name: &str) -> FileResult<Option<u32>> {
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<u32>() {
        Ok(0) | Err(_) => Err(FileError::Processing(format!(
            "Invalid {}: {}",
            name, value
        ))),
        Ok(v) => Ok(Some(v)),
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Largest size fitting inside `dimensions` with the original aspect ratio.
    ///
    /// Without `allow_upscale` the result never exceeds the original size.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        dimensions: ResizeDimensions,
        allow_upscale: bool,
    ) -> (u32, u32) {
        if orig_width == 0 || orig_height == 0 {
            return (orig_width, orig_height);
        }

        let scale_width = dimensions
            .width
            .map(|w| w as f64 / orig_width as f64)
            .unwrap_or(f64::INFINITY);
        let scale_height = dimensions
            .height
            .map(|h| h as f64 / orig_height as f64)
            .unwrap_or(f64::INFINITY);

        let mut scale = scale_width.min(scale_height);
        if !scale.is_finite() {
            return (orig_width, orig_height);
        }
        if !allow_upscale {
            scale = scale.min(1.0);
        }

        let width = ((orig_width as f64 * scale).round() as u32).max(1);
        let height = ((orig_height as f64 * scale).round() as u32).max(1);
        (width, height)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Fit the image inside `dimensions`. Returns `None` when the size would not change.
    pub fn apply_resize(
        img: &DynamicImage,
        dimensions: ResizeDimensions,
        allow_upscale: bool,
    ) -> Option<DynamicImage> {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) =
            Self::calculate_dimensions(orig_width, orig_height, dimensions, allow_upscale);

        if (width, height) == (orig_width, orig_height) {
            return None;
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        Some(img.resize_exact(width, height, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn dims(width: Option<u32>, height: Option<u32>) -> ResizeDimensions {
        ResizeDimensions { width, height }
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(
            ResizeDimensions::parse("800x600").unwrap(),
            dims(Some(800), Some(600))
        );
        assert_eq!(
            ResizeDimensions::parse("800x").unwrap(),
            dims(Some(800), None)
        );
        assert_eq!(
            ResizeDimensions::parse("x600").unwrap(),
            dims(None, Some(600))
        );
        assert!(ResizeDimensions::parse("x").is_err());
        assert!(ResizeDimensions::parse("800").is_err());
        assert!(ResizeDimensions::parse("0x10").is_err());
        assert!(ResizeDimensions::parse("abcx10").is_err());
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        // 2000x1000 into 500x500 is bounded by width
        assert_eq!(
            ImageResize::calculate_dimensions(2000, 1000, dims(Some(500), Some(500)), false),
            (500, 250)
        );
        // Only height given
        assert_eq!(
            ImageResize::calculate_dimensions(2000, 1000, dims(None, Some(100)), false),
            (200, 100)
        );
    }

    #[test]
    fn test_never_upscales_unless_allowed() {
        assert_eq!(
            ImageResize::calculate_dimensions(100, 50, dims(Some(400), None), false),
            (100, 50)
        );
        assert_eq!(
            ImageResize::calculate_dimensions(100, 50, dims(Some(400), None), true),
            (400, 200)
        );
    }

    #[test]
    fn test_tiny_results_keep_one_pixel() {
        assert_eq!(
            ImageResize::calculate_dimensions(1000, 1, dims(Some(10), None), false),
            (10, 1)
        );
    }

    #[test]
    fn test_apply_resize() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 20));

        let resized = ImageResize::apply_resize(&img, dims(Some(10), None), false).unwrap();
        assert_eq!(resized.dimensions(), (10, 5));

        assert!(ImageResize::apply_resize(&img, dims(Some(80), None), false).is_none());
    }
}
