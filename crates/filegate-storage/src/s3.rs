use crate::keys::{build_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutMode, PutPayload};
use std::time::Instant;

/// Backend for AWS S3 and S3-compatible services (MinIO, R2, ...).
///
/// Credentials are read from the standard `AWS_*` environment variables.
#[derive(Clone)]
pub struct S3Storage {
    client: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// `endpoint` points at an S3-compatible service; plain `http://`
    /// endpoints are allowed for local development.
    pub fn new(bucket: &str, region: &str, endpoint: Option<&str>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region);

        if let Some(endpoint) = endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let client = builder.build().map_err(|e| {
            StorageError::Misconfigured(format!("S3 client for bucket {}: {}", bucket, e))
        })?;

        Ok(Self {
            client,
            bucket: bucket.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn location(path: &str) -> StorageResult<Path> {
        validate_key(path)?;
        Ok(Path::from(path))
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn store(
        &self,
        data: Bytes,
        storage_name: &str,
        subfolder: &str,
    ) -> StorageResult<StoredObject> {
        let key = build_key(subfolder, storage_name)?;
        let size_bytes = data.len();
        let start = Instant::now();

        // Conditional put: a key that already exists fails instead of being replaced.
        self.client
            .put_opts(&Path::from(key.as_str()), PutPayload::from(data), PutMode::Create.into())
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes,
                    "S3 put rejected"
                );
                StorageError::WriteFailed(format!("{}: {}", key, e))
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object written to S3"
        );

        Ok(StoredObject {
            backend: StorageBackend::S3,
            path: key,
            storage_name: storage_name.to_string(),
        })
    }

    async fn remove(&self, path: &str) -> StorageResult<bool> {
        // S3 DELETE succeeds for missing keys, so presence is checked first.
        if !self.exists(path).await? {
            tracing::debug!(bucket = %self.bucket, key = %path, "Nothing to remove in S3");
            return Ok(false);
        }

        let start = Instant::now();
        self.client
            .delete(&Path::from(path))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %path,
                    "S3 delete rejected"
                );
                StorageError::RemoveFailed(format!("{}: {}", path, e))
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object removed from S3"
        );

        Ok(true)
    }

    async fn retrieve(&self, path: &str) -> StorageResult<Bytes> {
        let location = Self::location(path)?;
        let start = Instant::now();

        let object = match self.client.get(&location).await {
            Ok(object) => object,
            Err(ObjectStoreError::NotFound { .. }) => {
                return Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => {
                tracing::error!(error = %e, bucket = %self.bucket, key = %path, "S3 get rejected");
                return Err(StorageError::ReadFailed(format!("{}: {}", path, e)));
            }
        };

        let bytes = object
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(format!("{}: {}", path, e)))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %path,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object read from S3"
        );

        Ok(bytes)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let location = Self::location(path)?;
        match self.client.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
