//! Upload validation and download link configuration.

use serde::{Deserialize, Serialize};

/// Limits applied by the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted payload size in bytes (default 50 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Lifetime of a download handle in seconds (default one day).
    #[serde(default = "default_download_ttl")]
    pub download_link_ttl_seconds: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            download_link_ttl_seconds: default_download_ttl(),
        }
    }
}

fn default_max_file_size() -> u64 {
    52_428_800 // 50 MiB
}

fn default_download_ttl() -> u64 {
    86_400
}
