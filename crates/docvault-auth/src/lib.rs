//! # docvault-auth
//!
//! Authorization for DocVault.
//!
//! ## Modules
//!
//! - `checker`: the binary upload gate consulted before every upload
//! - `listing`: read-only permission summary for display

pub mod checker;
pub mod listing;

pub use checker::{PermissionChecker, UploadPermissionChecker};
pub use listing::{PermissionLister, PermissionSummary};
