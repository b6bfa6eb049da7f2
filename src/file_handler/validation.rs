//! Root directory validation.
//!
//! Checks that the configured log root can be scanned before any file is opened, so a
//! misconfigured root surfaces as a configuration error instead of an empty result.

use crate::error::{LogscopeError, Result};
use std::path::Path;

/// Validate that a path is an existing directory suitable for scanning
///
/// # Error Cases
/// - `RootNotFound` if the path does not exist
/// - `NotADirectory` if the path exists but is a file or other non-directory
/// - `FileError` if the metadata cannot be read
pub fn validate_root_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(LogscopeError::RootNotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| LogscopeError::file_error("Failed to read root metadata", e))?;

    if !metadata.is_dir() {
        return Err(LogscopeError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
