//! Classification reference data owned by the administrative subsystem.
//!
//! DocVault only reads these rows to validate foreign keys and to resolve
//! display names.

pub mod model;

pub use model::{Category, Department, Employee, Tab};
