//! Storage key and bucket allocation.
//!
//! Keys combine the sanitized base name, a second-resolution UTC timestamp
//! and 8 random hex characters (32 bits), so two uploads of the same file
//! in the same second still get distinct keys. Buckets depend only on the
//! classification. No counters or other shared state are involved.
//!
//! Bucket names follow S3 rules: 3 to 63 characters of `[a-z0-9-]`,
//! starting and ending with a letter or digit.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Longest base name kept in a storage key.
const MAX_BASE_LEN: usize = 100;

/// Longest bucket name S3 accepts.
pub const MAX_BUCKET_LEN: usize = 63;

/// Room kept for the widest `-tab{i32}-cat{i32}` suffix.
const MAX_PREFIX_LEN: usize = MAX_BUCKET_LEN - "-tab-2147483648-cat-2147483648".len();

const DEFAULT_BUCKET_PREFIX: &str = "file-management";

/// Where an upload is written in the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedName {
    /// Object key within the bucket.
    pub storage_key: String,
    /// Bucket for the `(tab, category)` pair.
    pub bucket: String,
}

/// Allocates storage keys and per-classification buckets.
#[derive(Debug, Clone)]
pub struct NameAllocator {
    bucket_prefix: String,
}

impl NameAllocator {
    /// Create an allocator whose buckets start with `bucket_prefix`.
    ///
    /// The prefix is normalized into a valid bucket name fragment; an
    /// unusable prefix falls back to `file-management`.
    pub fn new(bucket_prefix: impl Into<String>) -> Self {
        let requested = bucket_prefix.into();
        let prefix = normalize_bucket_prefix(&requested);
        if prefix != requested {
            warn!(
                requested = %requested,
                normalized = %prefix,
                "Bucket prefix adjusted to satisfy bucket naming rules"
            );
        }
        Self {
            bucket_prefix: prefix,
        }
    }

    /// Allocate a key and bucket for `original_filename` at the current time.
    pub fn allocate(&self, original_filename: &str, tab_id: i32, category_id: i32) -> AllocatedName {
        self.allocate_at(original_filename, tab_id, category_id, Utc::now())
    }

    /// Allocate using an explicit timestamp.
    pub fn allocate_at(
        &self,
        original_filename: &str,
        tab_id: i32,
        category_id: i32,
        now: DateTime<Utc>,
    ) -> AllocatedName {
        let (base, extension) = split_filename(original_filename);

        let mut base = sanitize(base);
        base.truncate(MAX_BASE_LEN);
        if base.trim_matches(|c| c == '_' || c == '.').is_empty() {
            base = "file".to_string();
        }

        let extension = sanitize(extension).to_ascii_lowercase();
        let disambiguator = &Uuid::new_v4().simple().to_string()[..8];

        let storage_key = if extension.is_empty() {
            format!("{base}_{}_{disambiguator}", now.format("%Y%m%d_%H%M%S"))
        } else {
            format!(
                "{base}_{}_{disambiguator}.{extension}",
                now.format("%Y%m%d_%H%M%S")
            )
        };

        AllocatedName {
            storage_key,
            bucket: self.bucket_for(tab_id, category_id),
        }
    }

    /// Bucket for a classification. Deterministic in `(tab_id, category_id)`.
    pub fn bucket_for(&self, tab_id: i32, category_id: i32) -> String {
        format!("{}-tab{tab_id}-cat{category_id}", self.bucket_prefix).to_ascii_lowercase()
    }
}

/// Split a filename into base name and extension at the last `.`.
pub fn split_filename(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) => (&filename[..pos], &filename[pos + 1..]),
        None => (filename, ""),
    }
}

/// Lowercase, map every other character to `-`, collapse runs, trim the
/// ends and clamp to [`MAX_PREFIX_LEN`].
fn normalize_bucket_prefix(value: &str) -> String {
    let mut prefix = String::with_capacity(value.len());
    for c in value.chars() {
        let c = if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            '-'
        };
        if c == '-' && (prefix.is_empty() || prefix.ends_with('-')) {
            continue;
        }
        prefix.push(c);
    }
    prefix.truncate(MAX_PREFIX_LEN);
    let prefix = prefix.trim_end_matches('-');

    if prefix.is_empty() {
        DEFAULT_BUCKET_PREFIX.to_string()
    } else {
        prefix.to_string()
    }
}

/// Replace everything outside `[A-Za-z0-9._-]` with `_`.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
