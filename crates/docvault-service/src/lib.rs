//! # docvault-service
//!
//! The file ingestion and lifecycle pipeline. Services compose the
//! validator, the upload gate, the name allocator, the object store, the
//! metadata repository and the audit logger into upload, download
//! accounting, soft-delete and activation workflows.
//!
//! Services follow constructor injection: all collaborators are provided
//! at construction time as `Arc` trait objects.

pub mod audit;
pub mod context;
pub mod error;
pub mod file;
pub mod pipeline;

pub use audit::AuditLogger;
pub use context::RequestContext;
pub use error::IngestError;
pub use file::{
    DownloadService, FileService, FileValidator, LifecycleService, UploadService,
};
pub use pipeline::IngestionPipeline;
