//! Storage orchestrator.
//!
//! Rule lookup → processing → naming → backend write → metadata. The returned
//! [`StoredFile`] is not persisted here; that is the caller's job.
//!
//! Validation is a precondition, not a step: [`FileStorageService::store`]
//! trusts its input, while [`FileStorageService::store_validated`] only
//! accepts a [`ValidatedUpload`] checked against the registered rule.

use bytes::Bytes;
use filegate_core::{
    generate_storage_name, sanitize_display_name, FileError, FileResult, RuleRegistry, StoredFile,
};
use filegate_processing::{ContentPipeline, ProcessingOptions, ValidatedUpload};
use filegate_storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_DISPLAY_NAME_MAX_LENGTH: usize = 255;

/// Everything the orchestrator needs besides the bytes.
#[derive(Debug, Clone)]
pub struct StoreRequest {
    /// User-supplied file name. Source of the storage extension and the display name.
    pub display_name: String,
    pub content_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub purpose: String,
    pub processing: ProcessingOptions,
    pub is_system_asset: bool,
}

impl StoreRequest {
    pub fn new(
        display_name: impl Into<String>,
        content_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            content_type: content_type.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            purpose: purpose.into(),
            processing: ProcessingOptions::default(),
            is_system_asset: false,
        }
    }

    pub fn with_processing(mut self, processing: ProcessingOptions) -> Self {
        self.processing = processing;
        self
    }

    pub fn system_asset(mut self) -> Self {
        self.is_system_asset = true;
        self
    }
}

/// Entry point for writing and deleting file content.
#[derive(Clone)]
pub struct FileStorageService {
    rules: Arc<RuleRegistry>,
    pipeline: ContentPipeline,
    storage: Arc<dyn Storage>,
    display_name_max_length: usize,
}

impl FileStorageService {
    pub fn new(rules: Arc<RuleRegistry>, storage: Arc<dyn Storage>) -> Self {
        Self {
            rules,
            pipeline: ContentPipeline::new(),
            storage,
            display_name_max_length: DEFAULT_DISPLAY_NAME_MAX_LENGTH,
        }
    }

    pub fn with_pipeline(mut self, pipeline: ContentPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_display_name_max_length(mut self, max_length: usize) -> Self {
        self.display_name_max_length = max_length;
        self
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Store raw bytes for an (entity type, purpose) slot.
    ///
    /// Does not validate `data` against the rule; run
    /// `filegate_processing::validate` first or use [`Self::store_validated`].
    pub async fn store(&self, data: Bytes, request: StoreRequest) -> FileResult<StoredFile> {
        let start = std::time::Instant::now();

        let rule = self
            .rules
            .require(&request.entity_type, &request.purpose)
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    entity_type = %request.entity_type,
                    purpose = %request.purpose,
                    "Store rejected, no rule for slot"
                );
            })?;

        let processed = self
            .pipeline
            .process(data, rule.content_kind, &request.processing)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    rule = %rule.key(),
                    content_kind = %rule.content_kind,
                    "Content processing failed, nothing written"
                );
            })?;

        let storage_name = generate_storage_name(&request.display_name);
        let display_name =
            sanitize_display_name(&request.display_name, self.display_name_max_length);
        if display_name.is_empty() {
            tracing::debug!(
                storage_name = %storage_name,
                "Display name suppressed, no safe name could be recovered"
            );
        }

        let subfolder = format!(
            "{}/{}",
            request.entity_type.to_lowercase(),
            request.purpose.to_lowercase()
        );
        let size_bytes = processed.data.len() as u64;

        let stored = self
            .storage
            .store(processed.data, &storage_name, &subfolder)
            .await?;

        let file = StoredFile {
            id: Uuid::new_v4(),
            storage_name: stored.storage_name,
            storage_path: stored.path,
            backend_kind: stored.backend,
            display_name,
            content_type: processed.content_type.unwrap_or(request.content_type),
            size_bytes,
            content_kind: rule.content_kind,
            is_system_asset: request.is_system_asset,
        };

        tracing::info!(
            file_id = %file.id,
            entity_type = %request.entity_type,
            entity_id = %request.entity_id,
            purpose = %request.purpose,
            storage_name = %file.storage_name,
            backend = %file.backend_kind,
            size_bytes = file.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File stored"
        );

        Ok(file)
    }

    /// Store an upload that already passed validation for its slot.
    ///
    /// The rule carried by `upload` must equal the registry's rule for the
    /// same slot; an upload checked against any other rule is refused before
    /// processing.
    pub async fn store_validated(
        &self,
        upload: ValidatedUpload,
        display_name: impl Into<String>,
        entity_id: impl Into<String>,
        processing: ProcessingOptions,
    ) -> FileResult<StoredFile> {
        let (data, content_type, rule) = upload.into_parts();

        let registered = self.rules.require(&rule.entity_type, &rule.purpose)?;
        if *registered != rule {
            tracing::warn!(
                rule = %rule.key(),
                "Store rejected, upload was validated against an unregistered rule"
            );
            return Err(FileError::Configuration(format!(
                "Upload was validated against a rule that differs from the registered rule for {}",
                rule.key()
            )));
        }

        let request = StoreRequest::new(
            display_name,
            content_type,
            rule.entity_type,
            entity_id,
            rule.purpose,
        )
        .with_processing(processing);

        self.store(data, request).await
    }

    /// Delete stored content. `Ok(false)` when nothing was there.
    pub async fn remove(&self, storage_path: &str) -> FileResult<bool> {
        let removed = self.storage.remove(storage_path).await?;
        tracing::debug!(storage_path = %storage_path, removed, "File remove finished");
        Ok(removed)
    }
}
