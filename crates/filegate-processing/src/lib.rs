//! Filegate Content Processing Library
//!
//! This crate provides upload validation and the kind-specific transforms run
//! before bytes reach a storage backend.

pub mod compression;
pub mod document;
pub mod image;
pub mod options;
pub mod pipeline;
pub mod traits;
pub mod validator;

// Re-export commonly used types
pub use compression::{ImageCompressor, OutputFormat, QualityPreset};
pub use document::DocumentProcessor;
pub use crate::image::{ImageResize, ImageTransformer, ResizeDimensions};
pub use options::ProcessingOptions;
pub use pipeline::ContentPipeline;
pub use traits::{ContentTransformer, ProcessedContent};
pub use validator::{validate, validate_upload, UploadCandidate, ValidatedUpload};
