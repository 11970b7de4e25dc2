use crate::keys::{build_key, validate_key};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Files on a local disk, rooted at one directory.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Creates `base_path` if missing and resolves it to an absolute path.
    /// Failure to do either is a configuration error.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::Misconfigured(format!(
                "Cannot create storage root {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let base_path = fs::canonicalize(&base_path).await.map_err(|e| {
            StorageError::Misconfigured(format!(
                "Cannot resolve storage root {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys are checked lexically first. An existing target must also
    /// resolve, through symlinks, inside the root.
    async fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);

        if let Ok(canonical) = fs::canonicalize(&path).await {
            if canonical.strip_prefix(&self.base_path).is_err() {
                return Err(StorageError::InvalidKey(
                    format!("{} escapes the storage root", storage_key),
                ));
            }
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        data: Bytes,
        storage_name: &str,
        subfolder: &str,
    ) -> StorageResult<StoredObject> {
        let key = build_key(subfolder, storage_name)?;
        let path = self.key_to_path(&key).await?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File written to disk"
        );

        Ok(StoredObject {
            backend: StorageBackend::Local,
            path: key,
            storage_name: storage_name.to_string(),
        })
    }

    async fn remove(&self, path: &str) -> StorageResult<bool> {
        let file_path = self.key_to_path(path).await?;
        let start = std::time::Instant::now();

        match fs::remove_file(&file_path).await {
            Ok(()) => {
                tracing::info!(
                    path = %file_path.display(),
                    key = %path,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "File removed from disk"
                );
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(key = %path, "Nothing to remove on disk");
                Ok(false)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %file_path.display(),
                    key = %path,
                    "Disk removal failed"
                );
                Err(StorageError::RemoveFailed(format!(
                    "Failed to delete file {}: {}",
                    file_path.display(),
                    e
                )))
            }
        }
    }

    async fn retrieve(&self, path: &str) -> StorageResult<Bytes> {
        let file_path = self.key_to_path(path).await?;
        let start = std::time::Instant::now();

        let data = fs::read(&file_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::ReadFailed(format!(
                "Failed to read file {}: {}",
                file_path.display(),
                e
            )),
        })?;

        tracing::debug!(
            path = %file_path.display(),
            key = %path,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File read from disk"
        );

        Ok(Bytes::from(data))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let file_path = self.key_to_path(path).await?;
        Ok(fs::try_exists(&file_path).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_store_retrieve() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = Bytes::from_static(b"test data");
        let stored = storage
            .store(data.clone(), "abc.txt", "request/attachment")
            .await
            .unwrap();

        assert_eq!(stored.backend, StorageBackend::Local);
        assert_eq!(stored.path, "request/attachment/abc.txt");
        assert_eq!(stored.storage_name, "abc.txt");
        assert!(storage
            .base_path()
            .join("request/attachment/abc.txt")
            .is_file());

        let retrieved = storage.retrieve(&stored.path).await.unwrap();
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn test_store_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .store(Bytes::from_static(b"first"), "same.txt", "x")
            .await
            .unwrap();
        let result = storage
            .store(Bytes::from_static(b"second"), "same.txt", "x")
            .await;
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));

        let retrieved = storage.retrieve("x/same.txt").await.unwrap();
        assert_eq!(&retrieved[..], b"first");
    }

    #[tokio::test]
    async fn test_new_creates_nested_base_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = LocalStorage::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(storage.base_path().is_absolute());
    }

    #[tokio::test]
    async fn test_new_fails_when_base_is_a_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("not-a-dir");
        std::fs::write(&file_path, b"x").unwrap();

        let result = LocalStorage::new(&file_path).await;
        assert!(matches!(result, Err(StorageError::Misconfigured(_))));
    }

    #[tokio::test]
    async fn test_remove_existing_returns_true() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let stored = storage
            .store(Bytes::from_static(b"bye"), "gone.txt", "x")
            .await
            .unwrap();

        assert!(storage.remove(&stored.path).await.unwrap());
        assert!(!storage.exists(&stored.path).await.unwrap());
        // A second removal finds nothing.
        assert!(!storage.remove(&stored.path).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_nonexistent_returns_false() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.remove("nonexistent/file.txt").await;
        assert!(!result.unwrap());
    }

    #[tokio::test]
    async fn test_remove_of_directory_is_error() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        std::fs::create_dir_all(dir.path().join("x").join("a-directory")).unwrap();

        let result = storage.remove("x/a-directory").await;
        assert!(matches!(result, Err(StorageError::RemoveFailed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_remove_permission_denied_is_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let stored = storage
            .store(Bytes::from_static(b"locked"), "locked.txt", "x")
            .await
            .unwrap();

        let folder = dir.path().join("x");
        std::fs::set_permissions(&folder, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions; nothing to check there.
        if std::fs::File::create(folder.join("write-check")).is_ok() {
            std::fs::set_permissions(&folder, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = storage.remove(&stored.path).await;
        std::fs::set_permissions(&folder, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(StorageError::RemoveFailed(_))));
        assert!(storage.exists(&stored.path).await.unwrap());
    }

    #[tokio::test]
    async fn test_retrieve_missing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.retrieve("x/missing.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.retrieve("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.remove("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .store(Bytes::from_static(b"x"), "passwd", "../etc")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_concurrent_stores_with_distinct_names() {
        let dir = tempdir().unwrap();
        let storage = std::sync::Arc::new(LocalStorage::new(dir.path()).await.unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    let name = format!("{}.bin", uuid::Uuid::new_v4());
                    storage
                        .store(Bytes::from_static(b"payload"), &name, "shared/slot")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut paths = Vec::new();
        for handle in handles {
            paths.push(handle.await.unwrap().path);
        }
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
    }
}
