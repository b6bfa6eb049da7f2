//! Result presentation: pagination, worker protocol and reply text.

pub mod paginate;
pub mod protocol;
pub mod reply;

pub use paginate::{paginate, ResultAggregator, ResultPage};
pub use reply::{render_error, render_page};
