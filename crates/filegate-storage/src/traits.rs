//! Backend contract shared by the local and S3 implementations.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::FileError;
use thiserror::Error;

/// Failures raised by a backend. All of them surface to callers as
/// adapter faults except `Misconfigured`, which is a configuration fault.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Remove failed: {0}")]
    RemoveFailed(String),

    #[error("No object at {0}")]
    NotFound(String),

    #[error("Rejected storage path: {0}")]
    InvalidKey(String),

    #[error("Backend failure: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Storage misconfigured: {0}")]
    Misconfigured(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for FileError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Misconfigured(msg) => FileError::Configuration(msg),
            other => FileError::Adapter(other.to_string()),
        }
    }
}

/// Where a backend put a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub backend: StorageBackend,
    /// Backend key, relative to the backend root. Pass it back to `remove`/`retrieve`.
    pub path: String,
    pub storage_name: String,
}

/// A place bytes can be written to and read back from by key.
///
/// Keys have the form `{subfolder}/{storage_name}` and are validated before any backend call.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `subfolder/storage_name`, creating intermediate
    /// directories as needed. Never overwrites an existing object.
    async fn store(
        &self,
        data: Bytes,
        storage_name: &str,
        subfolder: &str,
    ) -> StorageResult<StoredObject>;

    /// Delete an object.
    ///
    /// Returns `Ok(false)` when nothing exists at `path`; any other failure
    /// is an error.
    async fn remove(&self, path: &str) -> StorageResult<bool>;

    /// Read an object back, `StorageError::NotFound` when it does not exist.
    async fn retrieve(&self, path: &str) -> StorageResult<Bytes>;

    async fn exists(&self, path: &str) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}
