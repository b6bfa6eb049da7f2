use crate::render::paginate::ResultAggregator;
use crate::render::protocol::{RequestId, SearchCommand, SearchResponse};
use crate::search::{SearchEngine, SearchQuery};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinSet;

/// Run the search worker, serving commands from the front end until shutdown.
///
/// Each search runs on its own task, so a slow query does not hold up the ones queued
/// behind it. On `Shutdown` (or when the command channel closes) the worker stops
/// accepting requests and waits for in-flight searches to answer.
pub async fn search_worker_loop(
    mut rx: Receiver<SearchCommand>,
    tx: Sender<SearchResponse>,
    engine: Arc<dyn SearchEngine>,
    aggregator: ResultAggregator,
) {
    let mut state = WorkerState::new(tx, engine, aggregator);

    loop {
        tokio::select! {
            cmd = rx.recv() => {
                let done = match cmd {
                    Some(cmd) => state.handle_command(cmd),
                    None => true,
                };
                if done {
                    break;
                }
            }
            Some(joined) = state.in_flight.join_next(), if !state.in_flight.is_empty() => {
                WorkerState::reap(joined);
            }
        }
    }

    while let Some(joined) = state.in_flight.join_next().await {
        WorkerState::reap(joined);
    }
}

struct WorkerState {
    tx: Sender<SearchResponse>,
    engine: Arc<dyn SearchEngine>,
    aggregator: ResultAggregator,
    in_flight: JoinSet<()>,
}

impl WorkerState {
    fn new(
        tx: Sender<SearchResponse>,
        engine: Arc<dyn SearchEngine>,
        aggregator: ResultAggregator,
    ) -> Self {
        Self {
            tx,
            engine,
            aggregator,
            in_flight: JoinSet::new(),
        }
    }

    /// Returns true when the worker should stop accepting commands
    fn handle_command(&mut self, cmd: SearchCommand) -> bool {
        match cmd {
            SearchCommand::ExecuteSearch { request_id, query } => {
                self.spawn_search(request_id, query);
                false
            }
            SearchCommand::Shutdown => true,
        }
    }

    fn spawn_search(&mut self, request_id: RequestId, query: SearchQuery) {
        let engine = Arc::clone(&self.engine);
        let aggregator = self.aggregator;
        let tx = self.tx.clone();

        self.in_flight.spawn(async move {
            debug!("Request {request_id}: running {:?} query", query.kind());
            let outcome = engine.run(&query).await;
            let response = match outcome {
                Ok(hits) => SearchResponse::SearchCompleted {
                    request_id,
                    page: aggregator.paginate(hits),
                    query,
                },
                Err(error) => {
                    if error.is_validation() {
                        debug!("Request {request_id}: rejected: {error}");
                    } else {
                        warn!("Request {request_id}: search failed: {error}");
                    }
                    SearchResponse::Error { request_id, error }
                }
            };

            if tx.send(response).await.is_err() {
                debug!("Request {request_id}: response dropped, front end is gone");
            }
        });
    }

    fn reap(joined: std::result::Result<(), tokio::task::JoinError>) {
        if let Err(err) = joined {
            warn!("Search task failed: {err}");
        }
    }
}
