//! File services: validation, upload, download accounting, lifecycle and queries.

pub mod download;
pub mod lifecycle;
pub mod resolve;
pub mod service;
pub mod types;
pub mod upload;
pub mod validation;

pub use download::DownloadService;
pub use lifecycle::LifecycleService;
pub use resolve::ReferenceResolver;
pub use service::FileService;
pub use types::{
    BatchClassification, BatchItemResult, BatchUploadResult, DownloadHandle, FileDetails,
    ResolvedNames, UploadFile, UploadRequest,
};
pub use upload::UploadService;
pub use validation::{FilePayload, FileValidator, ValidationIssue, ValidationResult};
