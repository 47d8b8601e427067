//! Domain error types
//!
//! This module defines the error hierarchy for Sift. Errors are domain-specific
//! and don't expose third-party types; parser and driver failures are captured
//! as messages at the adapter boundary.

use thiserror::Error;

/// Main Sift error type
///
/// This is the primary error type used throughout the library. It wraps the
/// component-specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pattern registry errors (duplicate or unknown rules, bad expressions)
    #[error("Pattern registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Source content could not be converted to text
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Table sampling or schema inspection failed
    #[error("Data access error: {0}")]
    DataAccess(#[from] DataAccessError),

    /// Scan execution errors (panics, time budget exceeded)
    #[error("Scan error: {0}")]
    Scan(String),

    /// Invalid top-level input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Pattern registry errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A rule with the same name is already registered
    #[error("Rule already registered: {0}")]
    DuplicateRule(String),

    /// One or more requested rule names are not registered
    #[error("Unknown PII type(s): {}", .0.join(", "))]
    UnknownRule(Vec<String>),

    /// The rule expression failed to compile
    #[error("Invalid pattern for rule '{name}': {message}")]
    InvalidPattern { name: String, message: String },

    /// The pattern library could not be read or parsed
    #[error("Pattern library error: {0}")]
    Library(String),
}

/// Extraction errors
///
/// Raised when source bytes are malformed or unreadable for their declared
/// format. Unsupported formats are not an error; they extract to empty text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Content does not parse as the declared format
    #[error("Malformed {format} content: {message}")]
    Malformed { format: String, message: String },

    /// A container format is missing a required part
    #[error("Invalid {format} package: missing {part}")]
    MissingPart { format: String, part: String },

    /// A container format was given no bytes at all
    #[error("Empty {0} content")]
    EmptyInput(String),
}

impl ExtractionError {
    /// Creates a malformed-content error from any displayable parser error
    pub fn malformed(format: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Malformed {
            format: format.into(),
            message: error.to_string(),
        }
    }
}

/// Data access errors
///
/// Errors raised by the table-sampling collaborator. These don't expose
/// database driver types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataAccessError {
    /// Failed to connect or obtain a pooled connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The requested table does not exist or has no visible columns
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SiftError {
    fn from(err: std::io::Error) -> Self {
        SiftError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SiftError {
    fn from(err: serde_json::Error) -> Self {
        SiftError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SiftError {
    fn from(err: toml::de::Error) -> Self {
        SiftError::Configuration(format!("TOML parse error: {err}"))
    }
}
