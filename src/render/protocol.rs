//! Protocol definitions shared between the command front end and the search worker.

use crate::error::LogscopeError;
use crate::render::paginate::ResultPage;
use crate::search::SearchQuery;

/// Identifier attached to cross-task requests so responses can be correlated.
pub type RequestId = u64;

/// Commands sent from the front end to the search worker.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCommand {
    ExecuteSearch {
        request_id: RequestId,
        query: SearchQuery,
    },
    /// Stop accepting requests; in-flight searches still answer before the worker exits
    Shutdown,
}

/// Responses emitted by the search worker back to the front end.
///
/// Responses for concurrent requests may arrive in any order.
#[derive(Debug)]
pub enum SearchResponse {
    SearchCompleted {
        request_id: RequestId,
        query: SearchQuery,
        page: ResultPage,
    },
    Error {
        request_id: RequestId,
        error: LogscopeError,
    },
}

impl SearchResponse {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::SearchCompleted { request_id, .. } | Self::Error { request_id, .. } => {
                *request_id
            }
        }
    }
}
