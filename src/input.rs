//! Input subsystem: turning free-text chat commands into queries.

pub mod command;

pub use command::{parse_command, query_kind_for};
