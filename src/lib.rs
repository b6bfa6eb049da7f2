//! # logscope - Time-Windowed Log Search
//!
//! Scans a directory tree of timestamped event logs and answers structured queries:
//! keyword match, spatial-radius match, and radius match restricted to `DISMANTLED`
//! events, all within a time window on a given day.
//!
//! ## Features
//!
//! - **Fresh linear scans**: no index, no state kept between queries
//! - **Concurrent file scanning**: files are scanned on tokio tasks and merged in order
//! - **Tolerant parsing**: malformed lines never abort a scan, they just do not match
//! - **Chat-sized output**: results are sorted and cut into size-bounded chunks
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Immutable search configuration
//! - [`file_handler`] - Log file discovery and line parsing
//! - [`search`] - Queries, time windows, matchers and the scan engine
//! - [`render`] - Pagination, worker protocol and reply text
//! - [`input`] - Chat command parsing
//! - [`app`] - Application core and component coordination

// Core modules
pub mod config;
pub mod error;
pub mod file_handler;

// Front-end facing subsystems
pub mod input;
pub mod render;

// Core components
pub mod app;
pub mod search;

// Re-export commonly used types for convenience
pub use error::{LogscopeError, Result, ValidationError};

// Public API surface for external usage
pub use app::Application;
pub use config::SearchConfig;
pub use render::{ResultAggregator, ResultPage};
pub use search::{ScanEngine, SearchEngine, SearchHit, SearchQuery};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
