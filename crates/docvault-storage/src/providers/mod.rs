//! Object store implementations.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// Reject bucket or key segments that could escape their directory.
pub(crate) fn check_segment(kind: &str, value: &str) -> AppResult<()> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.chars().any(char::is_control)
    {
        return Err(AppError::validation(format!("Invalid {kind}: '{value}'")));
    }
    Ok(())
}
