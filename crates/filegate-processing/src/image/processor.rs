//! Image transformer - resize, re-encode and metadata stripping

use crate::compression::{ImageCompressor, OutputFormat};
use crate::image::resize::ImageResize;
use crate::options::ProcessingOptions;
use crate::traits::{ContentTransformer, ProcessedContent};
use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::{ContentKind, FileError, FileResult};
use img_parts::{jpeg::Jpeg, png::Png, ImageEXIF};

pub struct ImageTransformer;

#[async_trait]
impl ContentTransformer for ImageTransformer {
    fn content_kind(&self) -> ContentKind {
        ContentKind::Image
    }

    async fn transform(
        &self,
        data: Bytes,
        options: &ProcessingOptions,
    ) -> FileResult<ProcessedContent> {
        if options.is_noop() {
            return Ok(ProcessedContent::unchanged(data));
        }

        let options = options.clone();
        let start = std::time::Instant::now();
        let input_size = data.len();

        // Decoding and encoding are CPU-bound
        let processed = tokio::task::spawn_blocking(move || Self::process_sync(data, &options))
            .await
            .map_err(|e| FileError::Processing(format!("Image processing task failed: {}", e)))??;

        tracing::debug!(
            input_bytes = input_size,
            output_bytes = processed.data.len(),
            content_type = ?processed.content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image processed"
        );

        Ok(processed)
    }
}

impl ImageTransformer {
    fn process_sync(data: Bytes, options: &ProcessingOptions) -> FileResult<ProcessedContent> {
        let mut processed = if options.needs_decode() {
            Self::reencode(&data, options)?
        } else {
            ProcessedContent::unchanged(data)
        };

        if options.strip_metadata {
            processed.data = Self::remove_exif(processed.data);
        }

        Ok(processed)
    }

    fn reencode(data: &[u8], options: &ProcessingOptions) -> FileResult<ProcessedContent> {
        let source_format = image::guess_format(data)
            .map_err(|e| FileError::Processing(format!("Unrecognized image format: {}", e)))?;
        let img = image::load_from_memory_with_format(data, source_format)
            .map_err(|e| FileError::Processing(format!("Failed to decode image: {}", e)))?;

        let resized = options.resize.and_then(|dimensions| {
            ImageResize::apply_resize(&img, dimensions, options.allow_upscale)
        });

        // Nothing to do when the size is unchanged and no format was requested
        if resized.is_none() && options.format.is_none() {
            return Ok(ProcessedContent::unchanged(Bytes::copy_from_slice(data)));
        }

        let target = options
            .format
            .or_else(|| OutputFormat::from_image_format(source_format))
            .unwrap_or(OutputFormat::Png);

        let encoded =
            ImageCompressor::compress(resized.as_ref().unwrap_or(&img), target, options.quality)?;

        Ok(ProcessedContent {
            data: encoded,
            content_type: Some(target.to_mime_type().to_string()),
        })
    }

    /// Remove EXIF metadata from image
    ///
    /// Formats other than JPEG and PNG are returned untouched.
    pub fn remove_exif(data: Bytes) -> Bytes {
        // Try to parse as JPEG first
        if let Ok(mut jpeg) = Jpeg::from_bytes(data.clone()) {
            jpeg.set_exif(None);
            return jpeg.encoder().bytes();
        }

        // Try to parse as PNG
        if let Ok(mut png) = Png::from_bytes(data.clone()) {
            png.set_exif(None);
            return png.encoder().bytes();
        }

        data
    }
}
