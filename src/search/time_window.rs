//! Open time interval used to pre-filter records before matching.

use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Format of the date argument of a query
pub const QUERY_DATE_FORMAT: &str = "%d.%m.%Y";
/// Format of the start/end time arguments of a query
pub const QUERY_TIME_FORMAT: &str = "%H:%M";

/// An open interval `(start, end)` of wall-clock time.
///
/// Both boundaries are excluded: an event stamped exactly at `start` or `end` is outside
/// the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window, rejecting `start >= end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvertedWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a window from query arguments: `DD.MM.YYYY`, `HH:mm`, `HH:mm`
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self, ValidationError> {
        let day = NaiveDate::parse_from_str(date, QUERY_DATE_FORMAT).map_err(|_| {
            ValidationError::InvalidDate {
                input: date.to_string(),
            }
        })?;
        let start = parse_query_time(start)?;
        let end = parse_query_time(end)?;
        Self::new(day.and_time(start), day.and_time(end))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// True iff `start < timestamp < end`; a missing timestamp is never contained
    pub fn contains(&self, timestamp: Option<NaiveDateTime>) -> bool {
        matches!(timestamp, Some(t) if self.start < t && t < self.end)
    }
}

fn parse_query_time(input: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(input, QUERY_TIME_FORMAT).map_err(|_| ValidationError::InvalidTime {
        input: input.to_string(),
    })
}
