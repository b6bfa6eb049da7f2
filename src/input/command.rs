//! Chat command parsing.
//!
//! Commands are single lines such as
//! `/search-radius 01.03.2024 09:00 11:00 4521.3 9034.8 50`. The first word selects the
//! query kind; the remaining words are its arguments.

use crate::error::ValidationError;
use crate::search::{QueryKind, SearchQuery};

/// Query kind selected by a command word, if it is one
pub fn query_kind_for(command: &str) -> Option<QueryKind> {
    match command {
        "/search-keyword" => Some(QueryKind::Keyword),
        "/search-radius" => Some(QueryKind::Radius),
        "/search-dismantle" | "/search-dismantled" => Some(QueryKind::CategoryRadius),
        _ => None,
    }
}

/// Parse a line of chat text
///
/// # Returns
/// * `Ok(None)` if the text is not a search command (it should be ignored)
/// * `Ok(Some(query))` for a well-formed, validated command
/// * `Err(..)` for a recognised command with bad arguments
pub fn parse_command(text: &str) -> Result<Option<SearchQuery>, ValidationError> {
    let mut words = text.split_whitespace();
    let Some(kind) = words.next().and_then(query_kind_for) else {
        return Ok(None);
    };

    let args: Vec<&str> = words.collect();
    SearchQuery::from_args(kind, &args).map(Some)
}
