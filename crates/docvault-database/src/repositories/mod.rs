//! PostgreSQL repository implementations.

pub mod audit;
pub mod file;
pub mod permission;
pub mod reference;

pub use audit::AuditRepository;
pub use file::FileRepository;
pub use permission::PermissionGrantRepository;
pub use reference::ReferenceDataRepository;
