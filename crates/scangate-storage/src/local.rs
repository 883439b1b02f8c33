use crate::traits::{Storage, StorageError, StorageResult, StoredFile};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Local filesystem storage implementation.
///
/// Objects live at `{base_path}/{key}`; the content type recorded at write
/// time is kept in a `{key}.meta` sidecar so `get` can return it.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path`.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a storage key to a filesystem path.
    ///
    /// Keys come from an attacker-controlled form field, so traversal
    /// sequences and absolute paths are rejected before touching the
    /// filesystem.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty()
            || key.contains("..")
            || key.starts_with('/')
            || key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(key))
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut meta = path.as_os_str().to_owned();
        meta.push(".meta");
        PathBuf::from(meta)
    }

    async fn ensure_parent_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;
        Self::ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        file.flush()
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        fs::write(Self::meta_path(&path), content_type)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("metadata for {}: {}", key, e)))?;

        tracing::debug!(key = %key, size = data.len(), "Stored file");
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Option<StoredFile>> {
        let path = self.key_to_path(key)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!("{}: {}", path.display(), e)))
            }
        };

        let content_type = match fs::read_to_string(Self::meta_path(&path)).await {
            Ok(ct) => ct,
            Err(_) => DEFAULT_CONTENT_TYPE.to_string(),
        };

        Ok(Some(StoredFile {
            bytes: Bytes::from(bytes),
            content_type,
        }))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(dir.path()).await.expect("storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn put_then_get_returns_bytes_and_content_type() {
        let (_dir, storage) = storage().await;

        storage
            .put("ref-1", Bytes::from_static(b"hello"), "application/pdf")
            .await
            .expect("put");

        let stored = storage.get("ref-1").await.expect("get").expect("present");
        assert_eq!(&stored.bytes[..], b"hello");
        assert_eq!(stored.content_type, "application/pdf");
        assert!(storage.exists("ref-1").await.expect("exists"));
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let (_dir, storage) = storage().await;
        assert!(storage.get("absent").await.expect("get").is_none());
        assert!(!storage.exists("absent").await.expect("exists"));
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let (_dir, storage) = storage().await;
        for key in ["../escape", "/absolute", "a\\b", ""] {
            let err = storage.put(key, Bytes::from_static(b"x"), "text/plain").await;
            assert!(matches!(err, Err(StorageError::InvalidKey(_))), "key {:?}", key);
        }
    }

    #[tokio::test]
    async fn missing_sidecar_falls_back_to_octet_stream() {
        let (dir, storage) = storage().await;
        storage
            .put("ref-2", Bytes::from_static(b"data"), "text/plain")
            .await
            .expect("put");
        tokio::fs::remove_file(dir.path().join("ref-2.meta"))
            .await
            .expect("remove sidecar");

        let stored = storage.get("ref-2").await.expect("get").expect("present");
        assert_eq!(stored.content_type, DEFAULT_CONTENT_TYPE);
    }
}
