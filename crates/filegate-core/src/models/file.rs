use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rule::ContentKind;
use crate::storage_types::StorageBackend;

/// Metadata of a file written by the storage orchestrator.
///
/// The caller persists it; Filegate never mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: Uuid,
    /// Generated backend key, never derived from user input beyond the extension.
    pub storage_name: String,
    pub storage_path: String,
    pub backend_kind: StorageBackend,
    /// Sanitized user-facing name; empty means "do not display".
    pub display_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub content_kind: ContentKind,
    pub is_system_asset: bool,
}

/// Reference from a link to the stored file occupying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedFile {
    pub id: Uuid,
}

impl From<&StoredFile> for LinkedFile {
    fn from(file: &StoredFile) -> Self {
        LinkedFile { id: file.id }
    }
}

/// "This file occupies this (entity type, purpose, entity id) slot."
///
/// Links are persisted by the caller. Empty identifiers are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    pub entity_type: String,
    pub entity_id: String,
    pub purpose: String,
    pub file: Option<LinkedFile>,
    pub author_id: Option<String>,
}

impl FileLink {
    pub fn new(
        entity_type: impl Into<String>,
        purpose: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            purpose: purpose.into(),
            file: None,
            author_id: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<LinkedFile>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }
}
