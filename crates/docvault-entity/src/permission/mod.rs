//! Permission grants surfaced by the read-only permission listing.

pub mod level;
pub mod model;

pub use level::PermissionLevel;
pub use model::PermissionGrant;
