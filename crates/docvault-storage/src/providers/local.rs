//! Local filesystem object store.
//!
//! Each bucket is a directory under the root; each object is a file inside
//! it. Writes go to a temporary sibling first and are renamed into place
//! after `sync_all`, so a reader never sees a partially-written object.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::ObjectStore;

use super::check_segment;

/// Object store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    fn bucket_path(&self, bucket: &str) -> AppResult<PathBuf> {
        check_segment("bucket", bucket)?;
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> AppResult<PathBuf> {
        check_segment("key", key)?;
        Ok(self.bucket_path(bucket)?.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    fn locator(&self, bucket: &str, key: &str) -> String {
        format!("file://{}/{bucket}/{key}", self.root.display())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let path = self.object_path(bucket, key)?;
        if !self.bucket_exists(bucket).await? {
            return Err(AppError::storage(format!("Bucket does not exist: {bucket}")));
        }

        let tmp_path = self
            .root
            .join(bucket)
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

        let write = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&tmp_path, &path).await
        };

        if let Err(e) = write.await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object {bucket}/{key}"),
                e,
            ));
        }

        debug!(bucket, key, bytes = data.len(), content_type, "Wrote object");
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        let path = self.object_path(bucket, key)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Object not found: {bucket}/{key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read object {bucket}/{key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        let path = self.object_path(bucket, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(bucket, key, "Deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete object {bucket}/{key}"),
                e,
            )),
        }
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        let path = self.bucket_path(bucket)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to inspect bucket {bucket}"),
                e,
            )),
        }
    }

    async fn ensure_bucket(&self, bucket: &str) -> AppResult<()> {
        let path = self.bucket_path(bucket)?;
        fs::create_dir_all(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create bucket {bucket}"),
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.ensure_bucket("docs-tab1-cat5").await.unwrap();
        let data = Bytes::from("hello world");
        store
            .put("docs-tab1-cat5", "hello.txt", data.clone(), "text/plain")
            .await
            .unwrap();

        assert_eq!(store.get("docs-tab1-cat5", "hello.txt").await.unwrap(), data);

        store.delete("docs-tab1-cat5", "hello.txt").await.unwrap();
        let err = store.get("docs-tab1-cat5", "hello.txt").await.unwrap_err();
        assert!(err.is_not_found());

        // Deleting again is fine.
        store.delete("docs-tab1-cat5", "hello.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_requires_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let err = store
            .put("missing", "a.txt", Bytes::from("a"), "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_ensure_bucket_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert!(!store.bucket_exists("b").await.unwrap());
        store.ensure_bucket("b").await.unwrap();
        store.ensure_bucket("b").await.unwrap();
        assert!(store.bucket_exists("b").await.unwrap());
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_traversal_segments() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        assert!(store.ensure_bucket("..").await.is_err());
        assert!(store.get("b", "../secret").await.is_err());
    }
}
