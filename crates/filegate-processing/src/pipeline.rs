//! Processing pipeline dispatching on content kind

use crate::document::DocumentProcessor;
use crate::image::ImageTransformer;
use crate::options::ProcessingOptions;
use crate::traits::{ContentTransformer, ProcessedContent};
use bytes::Bytes;
use filegate_core::{ContentKind, FileResult};
use std::sync::Arc;

/// One transformer per content kind.
#[derive(Clone)]
pub struct ContentPipeline {
    image: Arc<dyn ContentTransformer>,
    document: Arc<dyn ContentTransformer>,
}

impl ContentPipeline {
    pub fn new() -> Self {
        Self {
            image: Arc::new(ImageTransformer),
            document: Arc::new(DocumentProcessor),
        }
    }

    /// Replace the transformer registered for the kind it reports.
    pub fn with_transformer(mut self, transformer: Arc<dyn ContentTransformer>) -> Self {
        match transformer.content_kind() {
            ContentKind::Image => self.image = transformer,
            ContentKind::Document => self.document = transformer,
        }
        self
    }

    fn transformer(&self, kind: ContentKind) -> &Arc<dyn ContentTransformer> {
        match kind {
            ContentKind::Image => &self.image,
            ContentKind::Document => &self.document,
        }
    }

    /// Run the transform for `kind`.
    pub async fn process(
        &self,
        data: Bytes,
        kind: ContentKind,
        options: &ProcessingOptions,
    ) -> FileResult<ProcessedContent> {
        self.transformer(kind).transform(data, options).await
    }
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use filegate_core::FileError;

    // Mock transformer for testing
    struct FailingTransformer;

    #[async_trait]
    impl ContentTransformer for FailingTransformer {
        fn content_kind(&self) -> ContentKind {
            ContentKind::Document
        }

        async fn transform(
            &self,
            _data: Bytes,
            _options: &ProcessingOptions,
        ) -> FileResult<ProcessedContent> {
            Err(FileError::Processing("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_dispatches_by_kind() {
        let pipeline = ContentPipeline::new();
        let data = Bytes::from_static(b"anything");

        let processed = pipeline
            .process(data.clone(), ContentKind::Document, &ProcessingOptions::default())
            .await
            .unwrap();
        assert_eq!(processed.data, data);

        let processed = pipeline
            .process(data.clone(), ContentKind::Image, &ProcessingOptions::default())
            .await
            .unwrap();
        assert_eq!(processed.data, data);
    }

    #[tokio::test]
    async fn test_replaced_transformer_only_affects_its_kind() {
        let pipeline = ContentPipeline::new().with_transformer(Arc::new(FailingTransformer));
        let data = Bytes::from_static(b"anything");

        let result = pipeline
            .process(data.clone(), ContentKind::Document, &ProcessingOptions::default())
            .await;
        assert!(matches!(result, Err(FileError::Processing(_))));

        assert!(pipeline
            .process(data, ContentKind::Image, &ProcessingOptions::default())
            .await
            .is_ok());
    }
}
