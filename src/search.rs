pub mod engine;
pub mod matcher;
pub mod query;
pub mod time_window;
pub mod worker;

pub use engine::{ScanEngine, SearchEngine, SearchHit};
pub use matcher::{Matcher, Point};
pub use query::{QueryKind, SearchQuery};
pub use time_window::TimeWindow;
pub use worker::search_worker_loop;
