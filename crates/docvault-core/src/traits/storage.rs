//! Object store trait for pluggable binary storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for durable binary storage addressed by `(bucket, key)`.
///
/// Implementations exist for the local filesystem, an in-memory store, and
/// S3-compatible services (MinIO, AWS). The trait is defined here in
/// `docvault-core` and implemented in `docvault-storage`.
///
/// Timeout and retry policy belongs to the implementation; callers make a
/// single attempt per operation.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Build the opaque locator persisted alongside metadata for an object.
    fn locator(&self, bucket: &str, key: &str) -> String;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write an object. The object is fully durable when this returns `Ok`.
    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Read an object into memory.
    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()>;

    /// Check whether a bucket exists.
    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool>;

    /// Create the bucket if it does not exist yet. Idempotent.
    async fn ensure_bucket(&self, bucket: &str) -> AppResult<()>;
}
