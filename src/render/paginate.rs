//! Result ordering, formatting and size-bounded pagination.
//!
//! Downstream transports have a message size limit, so the formatted result text is cut
//! into contiguous chunks. Only the first few chunks are returned; the rest are counted
//! so the caller can ask the user to narrow the search.

use crate::config::{SearchConfig, DEFAULT_CHUNK_BYTE_BUDGET, DEFAULT_MAX_CHUNKS};
use crate::search::SearchHit;

/// Ordered, size-bounded text chunks for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    pub chunks: Vec<String>,
    /// More chunks existed than were returned
    pub truncated: bool,
    /// Number of chunks beyond the returned ones
    pub omitted_chunks: usize,
}

impl ResultPage {
    /// True when the query produced no hits at all
    pub fn is_empty(&self) -> bool {
        self.total_chunks() == 0
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.len() + self.omitted_chunks
    }
}

/// Sorts, formats and paginates hits with fixed limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAggregator {
    chunk_byte_budget: usize,
    max_chunks: usize,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_BYTE_BUDGET, DEFAULT_MAX_CHUNKS)
    }
}

impl ResultAggregator {
    pub fn new(chunk_byte_budget: usize, max_chunks: usize) -> Self {
        Self {
            chunk_byte_budget,
            max_chunks,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.chunk_byte_budget, config.max_chunks)
    }

    pub fn paginate(&self, hits: Vec<SearchHit>) -> ResultPage {
        paginate(hits, self.chunk_byte_budget, self.max_chunks)
    }
}

/// Sort ascending by timestamp; equal timestamps keep their encounter order
pub fn sort_hits(hits: &mut [SearchHit]) {
    hits.sort_by_key(|hit| hit.timestamp);
}

/// One line per hit: `{display_date} | {text}`, joined with `\n`
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{} | {}", hit.display_date, hit.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` into contiguous pieces of at most `budget` bytes
///
/// Cuts ignore word and line boundaries but never split a UTF-8 character. A single
/// character wider than the budget gets a chunk of its own.
pub fn split_chunks(text: &str, budget: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut end = budget.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }

    chunks
}

/// Sort, format and split `hits`, keeping at most `max_chunks` chunks
pub fn paginate(mut hits: Vec<SearchHit>, chunk_byte_budget: usize, max_chunks: usize) -> ResultPage {
    if hits.is_empty() {
        return ResultPage::default();
    }

    sort_hits(&mut hits);
    let text = format_hits(&hits);
    let all = split_chunks(&text, chunk_byte_budget);
    let omitted_chunks = all.len().saturating_sub(max_chunks);

    ResultPage {
        chunks: all
            .into_iter()
            .take(max_chunks)
            .map(str::to_string)
            .collect(),
        truncated: omitted_chunks > 0,
        omitted_chunks,
    }
}
