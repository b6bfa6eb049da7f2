//! Application orchestration layer
//!
//! Wires the configuration, search engine and result aggregator together and exposes the
//! two ways a front end talks to them: one message at a time, or as a long-running
//! command loop served by the background search worker.

pub mod runtime;

use crate::config::SearchConfig;
use crate::error::{LogscopeError, Result};
use crate::input::parse_command;
use crate::render::protocol::{SearchCommand, SearchResponse};
use crate::render::{render_error, render_page, ResultAggregator, ResultPage};
use crate::search::{search_worker_loop, ScanEngine, SearchEngine, SearchQuery};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Application orchestrator - coordinates components without duplicating their state
pub struct Application {
    engine: Arc<dyn SearchEngine>,
    aggregator: ResultAggregator,
}

impl Application {
    /// Create application by validating the configuration and building the scan engine
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let aggregator = ResultAggregator::from_config(&config);
        let engine = Arc::new(ScanEngine::new(config));
        Ok(Self::with_engine(engine, aggregator))
    }

    /// Create application around an existing engine
    pub fn with_engine(engine: Arc<dyn SearchEngine>, aggregator: ResultAggregator) -> Self {
        Self { engine, aggregator }
    }

    /// Run a query and paginate its hits
    pub async fn search(&self, query: &SearchQuery) -> Result<ResultPage> {
        let hits = self.engine.run(query).await?;
        Ok(self.aggregator.paginate(hits))
    }

    /// Answer one line of chat text
    ///
    /// # Returns
    /// * `None` if the text is not a search command
    /// * The reply messages otherwise (results, a no-results notice, or an error)
    pub async fn handle_message(&self, text: &str) -> Option<Vec<String>> {
        let query = match parse_command(text) {
            Ok(Some(query)) => query,
            Ok(None) => return None,
            Err(invalid) => return Some(vec![render_error(&LogscopeError::from(invalid))]),
        };

        Some(match self.search(&query).await {
            Ok(page) => render_page(&query, &page),
            Err(error) => vec![render_error(&error)],
        })
    }

    /// Spawn the background search worker for this application's engine
    pub fn spawn_worker(
        &self,
        buffer: usize,
    ) -> (
        mpsc::Sender<SearchCommand>,
        mpsc::Receiver<SearchResponse>,
        JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(buffer);
        let (resp_tx, resp_rx) = mpsc::channel(buffer);
        let worker = tokio::spawn(search_worker_loop(
            cmd_rx,
            resp_tx,
            Arc::clone(&self.engine),
            self.aggregator,
        ));
        (cmd_tx, resp_rx, worker)
    }

    /// Serve commands read line-by-line from `input`, writing replies to `output`
    pub async fn run<R, W>(&self, input: R, output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        runtime::run_command_loop(self, input, output).await
    }
}

/// Reply messages for a worker response
pub fn render_response(response: &SearchResponse) -> Vec<String> {
    match response {
        SearchResponse::SearchCompleted { query, page, .. } => render_page(query, page),
        SearchResponse::Error { error, .. } => vec![render_error(error)],
    }
}
