//! Request and result types of the file services.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use docvault_core::types::FileId;
use docvault_entity::file::FileRecord;

use crate::error::IngestError;
use crate::file::validation::FilePayload;

/// A file received for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Filename supplied by the uploader.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// Declared size in bytes.
    pub declared_size: u64,
    /// The content.
    pub data: Bytes,
}

impl UploadFile {
    /// Creates an upload whose declared size is the content length.
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            declared_size: data.len() as u64,
            data,
        }
    }

    /// The view the validator inspects.
    pub fn payload(&self) -> FilePayload<'_> {
        FilePayload {
            filename: &self.filename,
            declared_size: self.declared_size,
            declared_content_type: &self.content_type,
            byte_length: self.data.len() as u64,
        }
    }
}

/// Upload request surface.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub tab_id: i32,
    pub category_id: i32,
    pub department_id: i32,
    pub uploader_id: i32,
    pub description: Option<String>,
    pub file: UploadFile,
}

/// Classification shared by every file of a batch upload.
#[derive(Debug, Clone)]
pub struct BatchClassification {
    pub tab_id: i32,
    pub category_id: i32,
    pub department_id: i32,
    pub uploader_id: i32,
    pub description: Option<String>,
}

impl BatchClassification {
    /// Combine the shared classification with one file.
    pub fn request_for(&self, file: UploadFile) -> UploadRequest {
        UploadRequest {
            tab_id: self.tab_id,
            category_id: self.category_id,
            department_id: self.department_id,
            uploader_id: self.uploader_id,
            description: self.description.clone(),
            file,
        }
    }
}

/// Display names resolved for a record's references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedNames {
    pub tab_name: Option<String>,
    pub category_name: Option<String>,
    pub department_name: Option<String>,
    pub uploader_name: Option<String>,
}

/// A file record together with its resolved display attributes.
#[derive(Debug, Clone, Serialize)]
pub struct FileDetails {
    /// The persisted record.
    #[serde(flatten)]
    pub record: FileRecord,
    /// Resolved reference names.
    #[serde(flatten)]
    pub names: ResolvedNames,
    /// Human-readable size.
    pub file_size_display: String,
}

impl FileDetails {
    /// Pair a record with its names.
    pub fn new(record: FileRecord, names: ResolvedNames) -> Self {
        let file_size_display = record.size_display();
        Self {
            record,
            names,
            file_size_display,
        }
    }
}

/// Time-bounded retrieval handle returned after a recorded download.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadHandle {
    pub file_id: FileId,
    pub bucket: String,
    pub key: String,
    /// Opaque locator understood by the object store.
    pub locator: String,
    /// Original filename, for the client's save dialog.
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    /// After this instant the handle should no longer be honoured.
    pub expires_at: DateTime<Utc>,
}

impl DownloadHandle {
    /// Whether the handle has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Outcome of one file within a batch upload.
#[derive(Debug)]
pub struct BatchItemResult {
    /// The filename as submitted.
    pub filename: String,
    /// The upload outcome.
    pub result: Result<FileDetails, IngestError>,
}

/// Outcome of a batch upload.
#[derive(Debug)]
pub struct BatchUploadResult {
    /// One entry per submitted file, in submission order.
    pub items: Vec<BatchItemResult>,
}

impl BatchUploadResult {
    /// Number of files uploaded.
    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    /// Number of files that failed.
    pub fn error_count(&self) -> usize {
        self.items.len() - self.success_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(size: i64) -> FileRecord {
        let now = Utc::now();
        FileRecord {
            id: FileId::new(),
            tab_id: 1,
            category_id: 5,
            department_id: 3,
            file_name: "report".to_string(),
            original_filename: "report.PDF".to_string(),
            file_extension: ".pdf".to_string(),
            file_size: size,
            mime_type: "application/pdf".to_string(),
            storage_bucket: "file-management-tab1-cat5".to_string(),
            storage_key: "report_20240101_120000_deadbeef.pdf".to_string(),
            storage_locator: "memory://file-management-tab1-cat5/report_20240101_120000_deadbeef.pdf"
                .to_string(),
            uploaded_by: 42,
            description: None,
            version: 1,
            is_current_version: true,
            parent_file_id: None,
            download_count: 0,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_file_details_serialize_flat() {
        let names = ResolvedNames {
            tab_name: Some("Engineering".to_string()),
            ..ResolvedNames::default()
        };
        let details = FileDetails::new(record(1536), names);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["original_filename"], "report.PDF");
        assert_eq!(json["tab_name"], "Engineering");
        assert!(json["category_name"].is_null());
        assert_eq!(json["file_size_display"], "1.50 KB");
    }

    #[test]
    fn test_download_handle_expiry() {
        let now = Utc::now();
        let handle = DownloadHandle {
            file_id: FileId::new(),
            bucket: "b".to_string(),
            key: "k".to_string(),
            locator: "memory://b/k".to_string(),
            filename: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
            size: 1,
            expires_at: now + Duration::seconds(60),
        };
        assert!(!handle.is_expired_at(now));
        assert!(handle.is_expired_at(now + Duration::seconds(60)));
    }

    #[test]
    fn test_batch_counts() {
        let outcome = BatchUploadResult {
            items: vec![
                BatchItemResult {
                    filename: "a.txt".to_string(),
                    result: Ok(FileDetails::new(record(1), ResolvedNames::default())),
                },
                BatchItemResult {
                    filename: "b.exe".to_string(),
                    result: Err(IngestError::validation(vec!["bad".to_string()])),
                },
            ],
        };
        assert_eq!(outcome.success_count(), 1);
        assert_eq!(outcome.error_count(), 1);
    }
}
