//! Document processor

use crate::options::ProcessingOptions;
use crate::traits::{ContentTransformer, ProcessedContent};
use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::{ContentKind, FileResult};

/// Identity transform for documents.
///
/// Format conversion, integrity checks or text extraction would hook in here.
/// Until then documents are stored exactly as received.
pub struct DocumentProcessor;

#[async_trait]
impl ContentTransformer for DocumentProcessor {
    fn content_kind(&self) -> ContentKind {
        ContentKind::Document
    }

    async fn transform(
        &self,
        data: Bytes,
        _options: &ProcessingOptions,
    ) -> FileResult<ProcessedContent> {
        tracing::trace!(size_bytes = data.len(), "Document passed through unchanged");
        Ok(ProcessedContent::unchanged(data))
    }
}
