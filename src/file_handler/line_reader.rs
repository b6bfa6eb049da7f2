//! Line-by-line log parsing with per-file base dates.
//!
//! Log lines only carry a time of day (`HH:mm:ss | ...`). The calendar date comes from a
//! fixed header line near the top of each file:
//!
//! ```text
//! ******************************************************************************
//! AdminLog started on 2024-03-01 at 10:00:00
//! ```
//!
//! The parser derives that base date once per file, then stamps every subsequent line
//! with `base date + time of day`. Lines whose time cannot be determined still produce a
//! [`LogRecord`], just with no timestamp, so a malformed header or footer never aborts
//! the scan.

use crate::error::{LogscopeError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use futures::stream::{self, Stream};
use log::debug;
use memchr::memmem;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// 1-based line number of the header carrying the file's start date
pub const HEADER_LINE: u64 = 4;
/// Display format of a base date
pub const BASE_DATE_FORMAT: &str = "%d.%m.%Y";
/// Separator between the time field and the event text
pub const TIME_DELIMITER: &str = " | ";

const HEADER_TOKEN: &str = "on";
const HEADER_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HEADER_DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// A single parsed log line. Lives only for the scan that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub source_file: PathBuf,
    /// 1-based
    pub line_number: u64,
    pub base_date: Option<NaiveDate>,
    /// `None` when the line has no parseable time or the file has no base date
    pub timestamp: Option<NaiveDateTime>,
    pub raw_text: String,
}

impl LogRecord {
    /// Base date rendered as `DD.MM.YYYY`, or an empty string when unknown
    pub fn display_date(&self) -> String {
        self.base_date
            .map(|date| date.format(BASE_DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

/// Extract the base date from a header line such as `AdminLog started on 2024-03-01 10:00:00`
///
/// The text after the first `"on"` (up to the next `"on"`, if any) is trimmed and parsed
/// as `YYYY-MM-DD HH:mm:ss`. Trailing text after the date-time is tolerated, and a bare
/// leading `YYYY-MM-DD` is accepted since only the date is kept.
pub fn parse_header_date(line: &str) -> Option<NaiveDate> {
    let mut pieces = line.split(HEADER_TOKEN);
    pieces.next()?;
    let candidate = pieces.next()?.trim();

    if let Ok((datetime, _)) =
        NaiveDateTime::parse_and_remainder(candidate, HEADER_DATETIME_FORMAT)
    {
        return Some(datetime.date());
    }

    NaiveDate::parse_and_remainder(candidate, HEADER_DATE_FORMAT)
        .ok()
        .map(|(date, _)| date)
}

/// Time of day from the field before the first `" | "`
pub fn parse_event_time(line: &str) -> Option<NaiveTime> {
    let end = memmem::find(line.as_bytes(), TIME_DELIMITER.as_bytes())?;
    NaiveTime::parse_from_str(line[..end].trim(), TIME_FORMAT).ok()
}

/// Forward-only reader that turns one log file into [`LogRecord`]s.
///
/// The file handle is owned by the parser and released when it is dropped, whether the
/// pass completed or stopped on an error.
pub struct LogLineParser {
    path: PathBuf,
    reader: BufReader<File>,
    buffer: Vec<u8>,
    line_number: u64,
    base_date: Option<NaiveDate>,
}

impl LogLineParser {
    /// Open `path` for a single forward pass
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await.map_err(|e| {
            LogscopeError::file_error(format!("Failed to open log file: {}", path.display()), e)
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            buffer: Vec::with_capacity(256),
            line_number: 0,
            base_date: None,
        })
    }

    /// Base date derived so far; `None` until the header line has been read
    pub fn base_date(&self) -> Option<NaiveDate> {
        self.base_date
    }

    /// Read the next line, or `None` at end of file
    ///
    /// # Errors
    /// * `FileError` if the underlying read fails. Malformed content is never an error.
    pub async fn next_record(&mut self) -> Result<Option<LogRecord>> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .await
            .map_err(|e| {
                LogscopeError::file_error(
                    format!("Failed to read log file: {}", self.path.display()),
                    e,
                )
            })?;

        if read == 0 {
            return Ok(None);
        }

        self.line_number += 1;
        let raw_text = decode_line(&self.buffer);

        if self.line_number == HEADER_LINE {
            self.base_date = parse_header_date(&raw_text);
            if self.base_date.is_none() {
                debug!(
                    "No base date in header of {}; its lines will not match any window",
                    self.path.display()
                );
            }
        }

        let timestamp = self
            .base_date
            .and_then(|date| parse_event_time(&raw_text).map(|time| date.and_time(time)));

        Ok(Some(LogRecord {
            source_file: self.path.clone(),
            line_number: self.line_number,
            base_date: self.base_date,
            timestamp,
            raw_text,
        }))
    }

    /// Consume the parser as a stream of records
    pub fn into_stream(self) -> impl Stream<Item = Result<LogRecord>> {
        stream::try_unfold(self, |mut parser| async move {
            let next = parser.next_record().await?;
            Ok::<_, LogscopeError>(next.map(|record| (record, parser)))
        })
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let line = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write test content");
        file.flush().expect("Failed to flush test file");
        file
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_header_date_variants() {
        assert_eq!(
            parse_header_date("Log started on 2024-03-01 10:00:00"),
            Some(date(2024, 3, 1))
        );
        assert_eq!(
            parse_header_date("AdminLog started on 2023-06-12 at 14:00:14"),
            Some(date(2023, 6, 12))
        );
        assert_eq!(
            parse_header_date("Log started on 2024-03-01 10:00:00 UTC"),
            Some(date(2024, 3, 1))
        );
        assert_eq!(parse_header_date("Log started 2024-03-01"), None);
        assert_eq!(parse_header_date("Log started on yesterday"), None);
    }

    #[test]
    fn test_parse_event_time() {
        assert_eq!(
            parse_event_time("10:15:23 | player entered"),
            NaiveTime::from_hms_opt(10, 15, 23)
        );
        assert_eq!(parse_event_time("10:15:23 player entered"), None);
        assert_eq!(parse_event_time("soon | player entered"), None);
        assert_eq!(parse_event_time(""), None);
    }

    #[tokio::test]
    async fn test_records_use_header_base_date() {
        let file = create_test_file(
            b"*****\n\
              \n\
              09:59:00 | before header\n\
              Log started on 2024-03-01 10:00:00\n\
              10:15:23 | player entered <12.0, 5.0>\r\n\
              no delimiter here\n",
        );

        let mut parser = LogLineParser::open(file.path()).await.unwrap();
        let mut records = Vec::new();
        while let Some(record) = parser.next_record().await.unwrap() {
            records.push(record);
        }

        assert_eq!(records.len(), 6);
        assert_eq!(parser.base_date(), Some(date(2024, 3, 1)));

        // Lines before the header have no base date yet
        assert_eq!(records[2].timestamp, None);
        assert_eq!(records[2].display_date(), "");

        let hit = &records[4];
        assert_eq!(hit.line_number, 5);
        assert_eq!(hit.raw_text, "10:15:23 | player entered <12.0, 5.0>");
        assert_eq!(hit.display_date(), "01.03.2024");
        assert_eq!(
            hit.timestamp,
            Some(date(2024, 3, 1).and_hms_opt(10, 15, 23).unwrap())
        );

        assert_eq!(records[5].timestamp, None);
        assert_eq!(records[5].raw_text, "no delimiter here");
    }

    #[tokio::test]
    async fn test_missing_header_yields_no_timestamps() {
        let file = create_test_file(b"a\nb\nc\nno date header\n10:00:01 | event\n");

        let parser = LogLineParser::open(file.path()).await.unwrap();
        let records: Vec<LogRecord> = parser.into_stream().try_collect().await.unwrap();

        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.timestamp.is_none()));
    }

    #[tokio::test]
    async fn test_short_file_without_header_line() {
        let file = create_test_file(b"10:00:01 | only line\n");

        let parser = LogLineParser::open(file.path()).await.unwrap();
        let records: Vec<LogRecord> = parser.into_stream().try_collect().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, None);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let file = create_test_file(b"a\nb\nc\nstarted on 2024-03-01 00:00:00\n10:00:01 | caf\xff\n");

        let parser = LogLineParser::open(file.path()).await.unwrap();
        let records: Vec<LogRecord> = parser.into_stream().try_collect().await.unwrap();

        assert_eq!(records[4].raw_text, "10:00:01 | caf\u{FFFD}");
        assert!(records[4].timestamp.is_some());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = LogLineParser::open(Path::new("/no/such/file.log")).await;
        assert!(matches!(result, Err(LogscopeError::FileError { .. })));
    }
}
