//! In-memory object store backed by `DashMap`. Contents are lost on exit.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{DashMap, DashSet};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::ObjectStore;

use super::check_segment;

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: String,
}

/// Process-local object store.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: DashSet<String>,
    objects: DashMap<(String, String), MemoryObject>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects across all buckets.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an object exists.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Content type recorded for an object.
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.content_type.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    fn locator(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        check_segment("bucket", bucket)?;
        check_segment("key", key)?;
        if !self.buckets.contains(bucket) {
            return Err(AppError::storage(format!("Bucket does not exist: {bucket}")));
        }
        self.objects.insert(
            (bucket.to_string(), key.to_string()),
            MemoryObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.data.clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {bucket}/{key}")))
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        self.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        Ok(self.buckets.contains(bucket))
    }

    async fn ensure_bucket(&self, bucket: &str) -> AppResult<()> {
        check_segment("bucket", bucket)?;
        self.buckets.insert(bucket.to_string());
        Ok(())
    }
}
