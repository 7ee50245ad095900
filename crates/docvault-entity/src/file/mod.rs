//! File domain entities.

pub mod model;
pub mod status;

pub use model::{FileRecord, format_file_size};
pub use status::FileStatus;
