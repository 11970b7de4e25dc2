#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use filegate_core::FileGateConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &FileGateConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config.s3_bucket.as_deref().ok_or_else(|| {
                StorageError::Misconfigured("S3_BUCKET not configured".to_string())
            })?;
            let region = config.s3_region.as_deref().ok_or_else(|| {
                StorageError::Misconfigured("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(bucket, region, config.s3_endpoint.as_deref())?;
            tracing::info!(
                backend = %StorageBackend::S3,
                bucket = %storage.bucket(),
                "Storage backend ready"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::Misconfigured(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(config.local_storage_path.clone()).await?;
            tracing::info!(
                backend = %StorageBackend::Local,
                path = %storage.base_path().display(),
                "Storage backend ready"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::Misconfigured(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
