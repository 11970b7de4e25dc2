//! Filegate Core Library
//!
//! This crate provides the domain model, rule registry, naming helpers, error
//! taxonomy and configuration shared by every Filegate component.

pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod rules;
pub mod storage_types;

// Re-export commonly used types
pub use config::FileGateConfig;
pub use error::{ErrorMetadata, FileError, FileResult, LogLevel, Violation};
pub use models::{
    AccessTicket, Audience, Cardinality, ContentKind, FileLink, LinkedFile, Rule, RuleKey,
    StoredFile,
};
pub use naming::{generate_storage_name, sanitize_display_name};
pub use rules::{RuleRegistry, RuleRegistryBuilder};
pub use storage_types::StorageBackend;
