//! Convenience result type alias for DocVault.

use crate::error::AppError;

/// A specialized `Result` type for DocVault adapter operations.
pub type AppResult<T> = Result<T, AppError>;
