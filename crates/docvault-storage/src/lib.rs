//! # docvault-storage
//!
//! Object naming and object store adapters for DocVault. The
//! [`NameAllocator`] decides where an upload lands; the providers implement
//! [`docvault_core::traits::ObjectStore`] over the local filesystem, process
//! memory, and S3-compatible services (behind the `s3` feature).

pub mod factory;
pub mod naming;
pub mod providers;

pub use factory::build_object_store;
pub use naming::{AllocatedName, NameAllocator};
