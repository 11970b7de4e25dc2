//! Core traits for content processing

use crate::options::ProcessingOptions;
use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::{ContentKind, FileResult};

/// Output of a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContent {
    pub data: Bytes,
    /// Set when the transform changed the encoding, e.g. a PNG re-encoded as WebP.
    pub content_type: Option<String>,
}

impl ProcessedContent {
    pub fn unchanged(data: Bytes) -> Self {
        Self {
            data,
            content_type: None,
        }
    }
}

/// Kind-specific transform applied before bytes are written.
///
/// A failed transform must return `FileError::Processing`; the pipeline never
/// falls back to the untransformed bytes.
#[async_trait]
pub trait ContentTransformer: Send + Sync {
    /// Kind this transformer handles
    fn content_kind(&self) -> ContentKind;

    /// Apply the transform
    async fn transform(
        &self,
        data: Bytes,
        options: &ProcessingOptions,
    ) -> FileResult<ProcessedContent>;
}
