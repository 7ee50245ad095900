//! Upload payload validation.
//!
//! Every rule is evaluated so the caller sees all violations at once.

use std::fmt;

use docvault_core::config::UploadConfig;
use docvault_entity::file::format_file_size;

/// Maximum filename length in characters.
pub const MAX_FILENAME_LEN: usize = 255;

/// Maximum declared content type length, parameters included.
pub const MAX_CONTENT_TYPE_LEN: usize = 255;

/// Allowed extensions and the content types registered for each.
pub const ALLOWED_TYPES: &[(&str, &[&str])] = &[
    ("pdf", &["application/pdf"]),
    ("doc", &["application/msword"]),
    (
        "docx",
        &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"],
    ),
    ("xls", &["application/vnd.ms-excel"]),
    (
        "xlsx",
        &["application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"],
    ),
    ("ppt", &["application/vnd.ms-powerpoint"]),
    (
        "pptx",
        &["application/vnd.openxmlformats-officedocument.presentationml.presentation"],
    ),
    ("txt", &["text/plain"]),
    ("jpg", &["image/jpeg"]),
    ("jpeg", &["image/jpeg"]),
    ("png", &["image/png"]),
    ("gif", &["image/gif"]),
    ("zip", &["application/zip"]),
    ("rar", &["application/x-rar-compressed"]),
    ("7z", &["application/x-7z-compressed"]),
    ("dwg", &["application/acad", "image/vnd.dwg"]),
    ("sql", &["text/plain", "application/sql", "application/x-sql"]),
];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// What the validator inspects.
#[derive(Debug, Clone, Copy)]
pub struct FilePayload<'a> {
    /// Filename supplied by the uploader.
    pub filename: &'a str,
    /// Size the uploader declared.
    pub declared_size: u64,
    /// Content type the uploader declared.
    pub declared_content_type: &'a str,
    /// Number of bytes actually received.
    pub byte_length: u64,
}

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    Empty,
    TooLarge { size: u64, max: u64 },
    SizeMismatch { declared: u64, actual: u64 },
    UnsupportedType { extension: String, content_type: String },
    ContentTypeTooLong { length: usize },
    BlankName,
    NameTooLong { length: usize },
    PathTraversal,
    ControlCharacters,
    ReservedName { name: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "File is required and cannot be empty"),
            Self::TooLarge { size, max } => write!(
                f,
                "File size {} exceeds maximum limit of {}",
                format_file_size(*size),
                format_file_size(*max)
            ),
            Self::SizeMismatch { declared, actual } => write!(
                f,
                "Declared size {declared} bytes does not match received size {actual} bytes"
            ),
            Self::UnsupportedType {
                extension,
                content_type,
            } => {
                if extension.is_empty() {
                    write!(f, "File type is not allowed: missing extension")
                } else {
                    write!(
                        f,
                        "File type is not allowed: '.{extension}' with content type '{content_type}'"
                    )
                }
            }
            Self::ContentTypeTooLong { length } => write!(
                f,
                "Content type is too long ({length} characters, maximum {MAX_CONTENT_TYPE_LEN})"
            ),
            Self::BlankName => write!(f, "File name is required"),
            Self::NameTooLong { length } => write!(
                f,
                "File name is too long ({length} characters, maximum {MAX_FILENAME_LEN})"
            ),
            Self::PathTraversal => write!(f, "File name contains path traversal sequences"),
            Self::ControlCharacters => write!(f, "File name contains control characters"),
            Self::ReservedName { name } => write!(f, "File name '{name}' is a reserved device name"),
        }
    }
}

/// Outcome of [`FileValidator::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether every rule passed.
    pub ok: bool,
    /// All violated rules, in evaluation order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Human-readable reason list.
    pub fn reasons(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Whether a specific issue was reported.
    pub fn has(&self, predicate: impl Fn(&ValidationIssue) -> bool) -> bool {
        self.issues.iter().any(predicate)
    }
}

/// Pure, side-effect-free upload validator.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: u64,
}

impl FileValidator {
    /// Creates a validator with the given size limit in bytes.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// Creates a validator from the `[upload]` configuration section.
    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_file_size_bytes)
    }

    /// Check a payload against every rule.
    pub fn validate(&self, payload: &FilePayload<'_>) -> ValidationResult {
        let mut issues = Vec::new();

        if payload.byte_length == 0 {
            issues.push(ValidationIssue::Empty);
        }
        if payload.byte_length > self.max_file_size {
            issues.push(ValidationIssue::TooLarge {
                size: payload.byte_length,
                max: self.max_file_size,
            });
        }
        if payload.declared_size != payload.byte_length {
            issues.push(ValidationIssue::SizeMismatch {
                declared: payload.declared_size,
                actual: payload.byte_length,
            });
        }

        let extension = file_extension(payload.filename);
        if !is_allowed_type(&extension, payload.declared_content_type) {
            issues.push(ValidationIssue::UnsupportedType {
                extension,
                content_type: payload.declared_content_type.to_string(),
            });
        }
        let content_type_len = payload.declared_content_type.chars().count();
        if content_type_len > MAX_CONTENT_TYPE_LEN {
            issues.push(ValidationIssue::ContentTypeTooLong {
                length: content_type_len,
            });
        }

        check_filename(payload.filename, &mut issues);

        ValidationResult {
            ok: issues.is_empty(),
            issues,
        }
    }
}

/// Lowercased text after the last `.`, or empty when there is none.
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Whether `(extension, content_type)` is an allow-listed pair.
///
/// Content types compare case-insensitively, ignoring `;` parameters.
pub fn is_allowed_type(extension: &str, content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    ALLOWED_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .is_some_and(|(_, types)| types.contains(&essence.as_str()))
}

fn check_filename(filename: &str, issues: &mut Vec<ValidationIssue>) {
    if filename.trim().is_empty() {
        issues.push(ValidationIssue::BlankName);
        return;
    }

    let length = filename.chars().count();
    if length > MAX_FILENAME_LEN {
        issues.push(ValidationIssue::NameTooLong { length });
    }
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        issues.push(ValidationIssue::PathTraversal);
    }
    if filename.chars().any(char::is_control) {
        issues.push(ValidationIssue::ControlCharacters);
    }

    let base = filename
        .rsplit_once('.')
        .map_or(filename, |(base, _)| base)
        .trim();
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(base))
    {
        issues.push(ValidationIssue::ReservedName {
            name: base.to_string(),
        });
    }
}
