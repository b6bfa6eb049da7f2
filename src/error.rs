//! Error types and handling infrastructure for logscope.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! ## Taxonomy
//!
//! - **Configuration**: missing or invalid root directory, bad config values. Fatal to a
//!   scan and surfaced before any file I/O.
//! - **Validation**: malformed queries (argument count, radius ceiling, bad date/time).
//!   Surfaced immediately, no scan is attempted.
//! - **Per-file I/O**: recovered inside the engine (logged and skipped). Only the
//!   low-level reader API returns them.
//! - **Per-line parse failures** are never errors: the record simply does not match.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The main error type for logscope operations.
#[derive(Error, Debug)]
pub enum LogscopeError {
    /// File system related errors (file vanished, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured log root does not exist
    #[error("Log root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// The configured log root exists but is not a directory
    #[error("Log root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Query rejected before scanning
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A scan did not finish within the configured deadline
    #[error("Search timed out after {elapsed:?}")]
    SearchTimeout { elapsed: Duration },

    /// Search operation errors
    #[error("Search operation failed: {message}")]
    SearchError { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

/// Reasons a query is rejected before any file is opened.
///
/// Every variant carries the parameters a front end needs to phrase its own reply.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Incorrect format. Please use \"{usage}\" (expected {expected} arguments, got {found})")]
    ArgumentCount {
        command: String,
        usage: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("The maximum radius allowed is {ceiling}. Please choose a smaller radius.")]
    RadiusExceedsCeiling { radius: f64, ceiling: f64 },

    #[error("Radius must be a non-negative number, got {radius}")]
    NegativeRadius { radius: f64 },

    #[error("Invalid date '{input}', expected DD.MM.YYYY")]
    InvalidDate { input: String },

    #[error("Invalid time '{input}', expected HH:mm")]
    InvalidTime { input: String },

    #[error("Invalid number for {field}: '{input}'")]
    InvalidNumber { field: &'static str, input: String },

    #[error("Time window start {start} must be before end {end}")]
    InvertedWindow { start: String, end: String },

    #[error("Keyword must not be empty")]
    EmptyKeyword,
}

/// Standard Result type for logscope operations.
pub type Result<T> = std::result::Result<T, LogscopeError>;

impl LogscopeError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a SearchError with a descriptive message
    pub fn search(message: impl Into<String>) -> Self {
        Self::SearchError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// True for errors that reject the query itself rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Automatic conversion from io::Error to LogscopeError
impl From<std::io::Error> for LogscopeError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
