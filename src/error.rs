//! Unified error types for auditpack.
//!
//! This module provides a single [`AuditpackError`] enum covering every
//! fallible boundary of the crate: opening an export bundle, writing output,
//! and storing photos.
//!
//! The transcript parser itself never fails. Unrecognized lines and blocks
//! without a location are dropped, and invalid UTF-8 is replaced. Only the
//! construction of a parser (which compiles the configured patterns) and the
//! I/O around it return errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for auditpack operations.
///
/// # Example
///
/// ```rust
/// use auditpack::error::Result;
/// use auditpack::ParsedRecord;
///
/// fn my_function() -> Result<Vec<ParsedRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, AuditpackError>;

/// The error type for all auditpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuditpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output or copying photos)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The zip archive could not be read or extracted.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Walking the extracted bundle failed.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A configured pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as configured
        pattern: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// The bundle does not contain a `.txt` transcript.
    #[error("No chat transcript (.txt) found in {}", path.display())]
    ChatNotFound {
        /// The bundle root that was searched
        path: PathBuf,
    },

    /// The input is neither a zip archive, a text transcript nor a directory.
    #[error("Unsupported input '{}': expected a .zip export, a .txt transcript or a directory", path.display())]
    UnsupportedInput {
        /// The offending path
        path: PathBuf,
    },

    /// A photo could not be stored.
    #[error("Failed to store photo '{name}': {message}")]
    Upload {
        /// Target name of the photo
        name: String,
        /// Description of the failure
        message: String,
    },

    /// Invalid date format in filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The configuration field
        field: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl AuditpackError {
    /// Creates a pattern error.
    pub fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        AuditpackError::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a missing-transcript error.
    pub fn chat_not_found(path: impl Into<PathBuf>) -> Self {
        AuditpackError::ChatNotFound { path: path.into() }
    }

    /// Creates an unsupported-input error.
    pub fn unsupported_input(path: impl Into<PathBuf>) -> Self {
        AuditpackError::UnsupportedInput { path: path.into() }
    }

    /// Creates a photo store error.
    pub fn upload(name: impl Into<String>, message: impl Into<String>) -> Self {
        AuditpackError::Upload {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        AuditpackError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        AuditpackError::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, AuditpackError::Io(_))
    }

    /// Returns `true` if the bundle had no transcript.
    pub fn is_chat_not_found(&self) -> bool {
        matches!(self, AuditpackError::ChatNotFound { .. })
    }

    /// Returns `true` if this is a photo store error.
    pub fn is_upload(&self) -> bool {
        matches!(self, AuditpackError::Upload { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, AuditpackError::InvalidDate { .. })
    }
}
