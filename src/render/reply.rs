//! User-facing reply text for chat-style front ends.
//!
//! The engine only reports outcomes (a page, an empty page, or a validation error with
//! its parameters). This module phrases them as the messages sent back to the user.

use crate::error::{LogscopeError, ValidationError};
use crate::render::paginate::ResultPage;
use crate::search::{QueryKind, SearchQuery};

/// Messages for a completed search: the chunks, plus a notice when results were cut
pub fn render_page(query: &SearchQuery, page: &ResultPage) -> Vec<String> {
    if page.is_empty() {
        return vec![no_results_message(query)];
    }

    let mut messages = page.chunks.clone();
    if page.truncated {
        messages.push(overflow_notice(query.kind()).to_string());
    }
    messages
}

/// Single message describing why a request could not be answered
pub fn render_error(error: &LogscopeError) -> String {
    match error {
        LogscopeError::Validation(ValidationError::ArgumentCount { usage, .. }) => {
            format!("Incorrect format. Please use \"{usage}\"")
        }
        LogscopeError::Validation(invalid) => invalid.to_string(),
        other => format!("Search failed: {other}"),
    }
}

pub fn no_results_message(query: &SearchQuery) -> String {
    match query {
        SearchQuery::Keyword { keyword, .. } => {
            let (start, end) = query.display_times();
            format!(
                "No results found for keyword '{keyword}' between {start} and {end} on {}.",
                query.display_date()
            )
        }
        SearchQuery::Radius { .. } => "No results found within the specified radius.".to_string(),
        SearchQuery::CategoryRadius { .. } => {
            "No dismantled events found within the specified radius.".to_string()
        }
    }
}

pub fn overflow_notice(kind: QueryKind) -> &'static str {
    match kind {
        QueryKind::Keyword => {
            "There are more log entries found. Please narrow your search by adjusting the time frame."
        }
        QueryKind::Radius => {
            "There are more logs within the specified radius. Please narrow down the search area."
        }
        QueryKind::CategoryRadius => {
            "There are more logs for dismantled events within the specified radius. Please narrow down the search area."
        }
    }
}
