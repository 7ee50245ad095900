//! Builds the configured object store.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::{StorageBackend, StorageConfig};
use docvault_core::result::AppResult;
use docvault_core::traits::ObjectStore;

use crate::providers::{LocalObjectStore, MemoryObjectStore};

/// Instantiate the object store selected by `[storage].backend`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::Local => Arc::new(LocalObjectStore::new(&config.local.root_path).await?),
        StorageBackend::Memory => Arc::new(MemoryObjectStore::new()),
        StorageBackend::S3 => build_s3(config).await?,
    };
    info!(provider = store.provider_type(), "Object store ready");
    Ok(store)
}

#[cfg(feature = "s3")]
async fn build_s3(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    Ok(Arc::new(
        crate::providers::S3ObjectStore::new(&config.s3).await?,
    ))
}

#[cfg(not(feature = "s3"))]
async fn build_s3(_config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    Err(docvault_core::AppError::configuration(
        "storage.backend = \"s3\" requires building with the `s3` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::config::LocalStorageConfig;

    #[tokio::test]
    async fn test_builds_local_and_memory() {
        let dir = tempfile::tempdir().unwrap();
        let local = StorageConfig {
            backend: StorageBackend::Local,
            local: LocalStorageConfig {
                root_path: dir.path().to_str().unwrap().to_string(),
            },
            ..StorageConfig::default()
        };
        assert_eq!(build_object_store(&local).await.unwrap().provider_type(), "local");

        let memory = StorageConfig {
            backend: StorageBackend::Memory,
            ..StorageConfig::default()
        };
        assert_eq!(build_object_store(&memory).await.unwrap().provider_type(), "memory");
    }
}
