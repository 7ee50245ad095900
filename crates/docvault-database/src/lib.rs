//! # docvault-database
//!
//! Metadata storage for DocVault. The [`MetadataRepository`] and
//! [`ReferenceRepository`] traits are the contracts the ingestion pipeline
//! consumes; this crate ships a PostgreSQL implementation built on sqlx and
//! an in-memory implementation for tests and local tooling.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use postgres::{PgMetadataRepository, PgReferenceRepository};
pub use traits::{MetadataRepository, ReferenceRepository};
