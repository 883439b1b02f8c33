//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement. The upload pipeline depends only on this trait, so test doubles
//! and alternative backends plug in without touching pipeline code.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored object: bytes plus the content type recorded at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Storage abstraction trait
///
/// Backends persist uploaded content under an opaque key. Writing the same
/// key twice overwrites; the pipeline never does so for distinct uploads
/// because keys are unique references.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under `key`.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Fetch the object stored under `key`, if any.
    async fn get(&self, key: &str) -> StorageResult<Option<StoredFile>>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
