//! Error taxonomy of the ingestion pipeline.
//!
//! Every pipeline operation returns [`IngestError`] as an explicit value.
//! The variant tells the caller what happened to durable state: nothing
//! was written (`Validation`, `PermissionDenied`, `Reference`, `Storage`),
//! a metadata write failed with no orphan left behind (`Persistence`), or
//! an object may exist without metadata (`PartialFailure`).

use docvault_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Error returned by pipeline operations.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload payload failed one or more validation rules.
    #[error("Validation failed: {}", .reasons.join("; "))]
    Validation {
        /// One entry per violated rule.
        reasons: Vec<String>,
    },

    /// The upload gate denied the actor.
    #[error("Permission denied: {reason}")]
    PermissionDenied {
        /// Why the gate denied the request.
        reason: String,
    },

    /// A classification or actor row is missing, inactive, or inconsistent.
    #[error("Reference error: {reason}")]
    Reference {
        /// Which reference failed.
        reason: String,
    },

    /// The object store failed before any metadata was written.
    #[error("Storage error: {0}")]
    Storage(#[source] AppError),

    /// The metadata store failed and no orphaned object remains.
    #[error("Persistence error: {0}")]
    Persistence(#[source] AppError),

    /// The object was stored, the metadata write failed, and the
    /// compensating delete failed too. Needs operator reconciliation.
    #[error(
        "Partial failure: object {bucket}/{key} was stored but its metadata was not ({cause}); \
         compensating delete failed: {compensation}"
    )]
    PartialFailure {
        /// Bucket holding the orphaned object.
        bucket: String,
        /// Key of the orphaned object.
        key: String,
        /// The metadata write failure.
        #[source]
        cause: AppError,
        /// The compensating delete failure.
        compensation: AppError,
    },

    /// The file id does not resolve to a usable record.
    #[error("Not found: {reason}")]
    NotFound {
        /// What was not found.
        reason: String,
    },
}

impl IngestError {
    /// Build a validation error from a reason list.
    pub fn validation(reasons: Vec<String>) -> Self {
        Self::Validation { reasons }
    }

    /// Build a permission-denied error.
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Build a reference error.
    pub fn reference(reason: impl Into<String>) -> Self {
        Self::Reference {
            reason: reason.into(),
        }
    }

    /// Build a not-found error.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    /// Human-readable reasons, one per problem.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::Validation { reasons } => reasons.clone(),
            other => vec![other.to_string()],
        }
    }

    /// The [`ErrorKind`] this error maps to at the application boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::PermissionDenied { .. } => ErrorKind::Authorization,
            Self::Reference { .. } => ErrorKind::Reference,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Persistence(_) => ErrorKind::Database,
            Self::PartialFailure { .. } => ErrorKind::PartialFailure,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Whether repeating the whole operation is safe.
    ///
    /// A partial failure is never retryable: a retry allocates a new name
    /// and leaves the orphan in place.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Persistence(_))
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        let message = err.to_string();
        match err {
            IngestError::Validation { .. } => AppError::validation(message),
            IngestError::PermissionDenied { .. } => AppError::authorization(message),
            IngestError::Reference { .. } => AppError::reference(message),
            IngestError::NotFound { .. } => AppError::not_found(message),
            other => AppError::new(other.kind(), message),
        }
    }
}
