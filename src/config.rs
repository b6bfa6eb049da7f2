//! Process-wide search configuration.
//!
//! A [`SearchConfig`] is built once at startup (from a TOML file, then CLI overrides)
//! and handed to the engine by value. Nothing in the library reads configuration from
//! global state.

use crate::error::{LogscopeError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default filename suffix for log files
pub const DEFAULT_EXTENSION: &str = ".log";
/// Default chunk size, sized below a 2000 character chat message limit
pub const DEFAULT_CHUNK_BYTE_BUDGET: usize = 1900;
/// Default number of chunks returned per query
pub const DEFAULT_MAX_CHUNKS: usize = 5;
/// Default number of files scanned concurrently
pub const DEFAULT_SCAN_CONCURRENCY: usize = 4;

/// Immutable configuration for the search engine and result pagination.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Directory scanned recursively for log files
    pub root: PathBuf,
    /// Filename suffix filter (e.g. `.log`)
    pub extension: String,
    pub chunk_byte_budget: usize,
    pub max_chunks: usize,
    pub scan_concurrency: usize,
    /// Optional deadline around a whole scan
    pub scan_timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            chunk_byte_budget: DEFAULT_CHUNK_BYTE_BUDGET,
            max_chunks: DEFAULT_MAX_CHUNKS,
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
            scan_timeout_secs: None,
        }
    }
}

impl SearchConfig {
    /// Create a configuration for `root` with every other field defaulted
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Builder-style override of the extension filter
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Builder-style override of the scan concurrency
    pub fn with_scan_concurrency(mut self, workers: usize) -> Self {
        self.scan_concurrency = workers;
        self
    }

    /// Builder-style override of the pagination limits
    pub fn with_pagination(mut self, chunk_byte_budget: usize, max_chunks: usize) -> Self {
        self.chunk_byte_budget = chunk_byte_budget;
        self.max_chunks = max_chunks;
        self
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| LogscopeError::config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    ///
    /// # Errors
    /// * `FileError` if the file cannot be read
    /// * `ConfigError` if the TOML is malformed or fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LogscopeError::file_error(
                format!("Failed to read config file: {}", path.display()),
                e,
            )
        })?;
        Self::from_toml_str(&text)
    }

    /// Location of the per-user config file, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logscope").join("config.toml"))
    }

    /// Scan deadline, if one is configured
    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_secs.map(Duration::from_secs)
    }

    /// Check values that would make a scan or pagination meaningless
    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(LogscopeError::config("extension must not be empty"));
        }
        if self.chunk_byte_budget == 0 {
            return Err(LogscopeError::config("chunk_byte_budget must be positive"));
        }
        if self.max_chunks == 0 {
            return Err(LogscopeError::config("max_chunks must be positive"));
        }
        if self.scan_concurrency == 0 {
            return Err(LogscopeError::config("scan_concurrency must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::new("/var/log/game");
        assert_eq!(config.root, PathBuf::from("/var/log/game"));
        assert_eq!(config.extension, ".log");
        assert_eq!(config.chunk_byte_budget, 1900);
        assert_eq!(config.max_chunks, 5);
        assert!(config.scan_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SearchConfig::from_toml_str(
            r#"
            root = "/srv/logs"
            extension = ".ADM"
            scan_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/logs"));
        assert_eq!(config.extension, ".ADM");
        assert_eq!(config.max_chunks, DEFAULT_MAX_CHUNKS);
        assert_eq!(config.scan_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_and_invalid() {
        assert!(matches!(
            SearchConfig::from_toml_str("token = \"secret\""),
            Err(LogscopeError::ConfigError { .. })
        ));
        assert!(matches!(
            SearchConfig::from_toml_str("root = \"/x\"\nmax_chunks = 0"),
            Err(LogscopeError::ConfigError { .. })
        ));
        assert!(matches!(
            SearchConfig::from_toml_str("extension = \"\""),
            Err(LogscopeError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "root = \"/data\"\nscan_concurrency = 2").expect("write config");

        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.scan_concurrency, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = SearchConfig::load(Path::new("/this/config/does/not/exist.toml"));
        assert!(matches!(result, Err(LogscopeError::FileError { .. })));
    }
}
