//! Filegate Storage Library
//!
//! This crate provides the storage backend abstraction and its implementations
//! for the local filesystem and S3-compatible object stores.
//!
//! # Storage key format
//!
//! Backends write every file under `{subfolder}/{storage_name}`. The subfolder is
//! an opaque string chosen by the caller; backends know nothing about entity
//! types or purposes. Keys must not contain `..`, a backslash or a leading `/`.
//! Key handling is centralized in the `keys` module so all backends stay
//! consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use filegate_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
