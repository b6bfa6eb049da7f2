//! Linear-scan search engine.
//!
//! Every query performs a fresh scan: discover the candidate files, stream each file's
//! records, keep the ones inside the time window that satisfy the query's matcher. Files
//! are scanned concurrently, but their hits are merged back in file order so the
//! encounter order seen by the aggregator does not depend on task scheduling.

use crate::config::SearchConfig;
use crate::error::{LogscopeError, Result};
use crate::file_handler::{LogFileSet, LogLineParser};
use crate::search::matcher::Matcher;
use crate::search::query::SearchQuery;
use crate::search::time_window::TimeWindow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures::TryStreamExt;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A matching line, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Base date of the source file as `DD.MM.YYYY`
    pub display_date: String,
    pub timestamp: NaiveDateTime,
    /// The full original line
    pub text: String,
}

/// Core trait for running structured queries against a log tree.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Run `query` and return every hit in encounter order (file order, then line order)
    ///
    /// # Errors
    /// * `Validation` if the query is rejected before scanning
    /// * `RootNotFound` / `NotADirectory` if the configured root cannot be scanned
    /// * `SearchTimeout` if a configured deadline elapses
    ///
    /// Unreadable files are logged and skipped. No hits is `Ok(vec![])`.
    async fn run(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;
}

/// [`SearchEngine`] that scans every matching file on each query.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    config: Arc<SearchConfig>,
}

impl ScanEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    async fn discover(&self) -> Result<LogFileSet> {
        let root = self.config.root.clone();
        let extension = self.config.extension.clone();
        tokio::task::spawn_blocking(move || LogFileSet::discover(&root, &extension))
            .await
            .map_err(|e| LogscopeError::search(format!("File discovery task failed: {e}")))?
    }

    async fn scan(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let files = self.discover().await?.into_paths();
        info!(
            "Searching {} files under {} for {:?} query",
            files.len(),
            self.config.root.display(),
            query.kind()
        );

        let hits = self.scan_paths(&files, query).await;
        info!("Search finished with {} hits", hits.len());
        Ok(hits)
    }

    /// Scan `files` concurrently and merge their hits in the order the paths are given
    ///
    /// A file that cannot be opened or read is logged and contributes no hits; the other
    /// files are still scanned.
    async fn scan_paths(&self, files: &[PathBuf], query: &SearchQuery) -> Vec<SearchHit> {
        let window = *query.window();
        let matcher = Arc::new(query.matcher());
        // A zero limit would leave every task waiting on a permit
        let permits = Arc::new(Semaphore::new(self.config.scan_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, path) in files.iter().cloned().enumerate() {
            let matcher = Arc::clone(&matcher);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => scan_file(&path, &window, &matcher).await,
                    Err(_) => Err(LogscopeError::search("Scan permits closed")),
                };
                (index, outcome)
            });
        }

        // Merge barrier: every file finishes (or fails) before hits are handed on
        let mut per_file: Vec<Vec<SearchHit>> = vec![Vec::new(); files.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(hits))) => per_file[index] = hits,
                Ok((index, Err(err))) => {
                    warn!("Skipping {}: {}", files[index].display(), err);
                }
                Err(err) => warn!("File scan task failed: {err}"),
            }
        }

        per_file.into_iter().flatten().collect()
    }
}

#[async_trait]
impl SearchEngine for ScanEngine {
    async fn run(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        query.validate()?;

        match self.config.scan_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.scan(query))
                .await
                .map_err(|_| LogscopeError::SearchTimeout { elapsed: limit })?,
            None => self.scan(query).await,
        }
    }
}

/// Scan one file and collect its hits in line order
///
/// # Errors
/// * `FileError` if the file cannot be opened or a read fails part-way. Hits collected
///   before the failure are discarded with the file.
pub async fn scan_file(path: &Path, window: &TimeWindow, matcher: &Matcher) -> Result<Vec<SearchHit>> {
    debug!("Searching in file: {}", path.display());

    let parser = LogLineParser::open(path).await?;
    let mut records = pin!(parser.into_stream());
    let mut hits = Vec::new();

    while let Some(record) = records.try_next().await? {
        let Some(timestamp) = record.timestamp else {
            continue;
        };
        if !window.contains(Some(timestamp)) || !matcher.is_match(&record.raw_text) {
            continue;
        }
        hits.push(SearchHit {
            display_date: record.display_date(),
            timestamp,
            text: record.raw_text,
        });
    }

    Ok(hits)
}

/// Paths scanned by a query, for diagnostics
pub fn candidate_files(config: &SearchConfig) -> Result<Vec<PathBuf>> {
    Ok(LogFileSet::discover(&config.root, &config.extension)?.into_paths())
}
