//! File discovery and line-oriented log reading.
//!
//! This module resolves the set of candidate log files under a root directory and turns
//! each file into a lazy sequence of timestamped [`LogRecord`]s.

pub mod file_set;
pub mod line_reader;
pub mod validation;

pub use file_set::LogFileSet;
pub use line_reader::{LogLineParser, LogRecord};
pub use validation::validate_root_dir;
