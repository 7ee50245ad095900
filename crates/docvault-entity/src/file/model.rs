//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::FileId;

use super::status::FileStatus;

/// The durable representation of one uploaded file.
///
/// `is_deleted = true` always implies `is_active = false`; repositories
/// enforce this on every write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier. Immutable once assigned.
    pub id: FileId,
    /// Tab the file is classified under.
    pub tab_id: i32,
    /// Category within the tab.
    pub category_id: i32,
    /// Owning department.
    pub department_id: i32,
    /// Human file name (original name without extension).
    pub file_name: String,
    /// File name as supplied by the uploader.
    pub original_filename: String,
    /// Lowercase extension including the leading dot (e.g. `.pdf`).
    pub file_extension: String,
    /// Number of bytes written to the object store.
    pub file_size: i64,
    /// Declared content type.
    pub mime_type: String,
    /// Object store bucket holding the content.
    pub storage_bucket: String,
    /// Object key within the bucket.
    pub storage_key: String,
    /// Opaque locator understood by the object store.
    pub storage_locator: String,
    /// Employee who uploaded the file.
    pub uploaded_by: i32,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Version number within the version chain (starts at 1).
    pub version: i32,
    /// Whether this record is the current version of its chain.
    pub is_current_version: bool,
    /// Previous version, if this record is a revision.
    pub parent_file_id: Option<FileId>,
    /// Number of recorded downloads.
    pub download_count: i32,
    /// Whether the file is visible in active listings.
    pub is_active: bool,
    /// Whether the file has been soft-deleted.
    pub is_deleted: bool,
    /// When the file was soft-deleted.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Employee who soft-deleted the file.
    pub deleted_by: Option<i32>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// Lifecycle state collapsed from the two stored flags.
    pub fn status(&self) -> FileStatus {
        FileStatus::from_flags(self.is_active, self.is_deleted)
    }

    /// Whether a download may be recorded for this file.
    pub fn is_downloadable(&self) -> bool {
        self.status() == FileStatus::Active
    }

    /// Human-readable file size (e.g. `"1.50 MB"`).
    pub fn size_display(&self) -> String {
        format_file_size(self.file_size.max(0) as u64)
    }
}

/// Format a byte count the way upload responses display it.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
