use crate::compression::{OutputFormat, QualityPreset};
use crate::image::ResizeDimensions;
use serde::{Deserialize, Serialize};

/// Caller-selected transforms. Only image content honours them today.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    pub resize: Option<ResizeDimensions>,
    pub allow_upscale: bool,
    /// Re-encode target. `None` keeps the source format.
    pub format: Option<OutputFormat>,
    pub quality: QualityPreset,
    /// Drop EXIF from JPEG/PNG without touching pixel data.
    pub strip_metadata: bool,
}

impl ProcessingOptions {
    pub fn resize(mut self, dimensions: ResizeDimensions) -> Self {
        self.resize = Some(dimensions);
        self
    }

    pub fn allow_upscale(mut self) -> Self {
        self.allow_upscale = true;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn quality(mut self, quality: QualityPreset) -> Self {
        self.quality = quality;
        self
    }

    pub fn strip_metadata(mut self) -> Self {
        self.strip_metadata = true;
        self
    }

    /// Whether pixels must be decoded at all.
    pub fn needs_decode(&self) -> bool {
        self.resize.is_some() || self.format.is_some()
    }

    pub fn is_noop(&self) -> bool {
        !self.needs_decode() && !self.strip_metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_noop() {
        assert!(ProcessingOptions::default().is_noop());
        assert!(!ProcessingOptions::default().strip_metadata().is_noop());
        assert!(!ProcessingOptions::default().strip_metadata().needs_decode());
        assert!(ProcessingOptions::default()
            .format(OutputFormat::Png)
            .needs_decode());
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: ProcessingOptions =
            serde_json::from_str(r#"{"resize":{"width":320,"height":null},"format":"webp"}"#)
                .unwrap();
        assert_eq!(
            options.resize,
            Some(ResizeDimensions {
                width: Some(320),
                height: None
            })
        );
        assert_eq!(options.format, Some(OutputFormat::WebP));
        assert_eq!(options.quality, QualityPreset::Normal);
        assert!(!options.allow_upscale);
    }
}
