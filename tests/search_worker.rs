use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use logscope::error::{LogscopeError, ValidationError};
use logscope::render::protocol::{SearchCommand, SearchResponse};
use logscope::render::ResultAggregator;
use logscope::search::worker::search_worker_loop;
use logscope::search::{Point, ScanEngine, SearchEngine, SearchQuery, TimeWindow};
use logscope::SearchConfig;

const TIMEOUT_MS: u64 = 2000;

const LOG: &str = "******************************\n\
                   AdminLog started\n\
                   ******************************\n\
                   AdminLog started on 2024-03-01 at 09:30:00\n\
                   09:45:10 | Player \"Ann\" is connected\n\
                   10:15:23 | Player \"Ann\" (pos=<12.0, 5.0, 30.0>) placed Fence\n\
                   10:20:00 | Player \"Bob\" (pos=<400.0, 50.0, 420.0>) DISMANTLED Fence\n\
                   10:40:00 | Player \"Ann\" has been disconnected\n";

async fn next_response(rx: &mut mpsc::Receiver<SearchResponse>) -> SearchResponse {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("worker response timed out")
        .expect("worker channel closed unexpectedly")
}

fn window() -> TimeWindow {
    TimeWindow::parse("01.03.2024", "09:00", "11:00").expect("valid window")
}

async fn spawn_worker(
    contents: &str,
) -> (
    mpsc::Sender<SearchCommand>,
    mpsc::Receiver<SearchResponse>,
    tokio::task::JoinHandle<()>,
    tempfile::TempDir,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(4);
    let (resp_tx, resp_rx) = mpsc::channel(4);

    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join("server.log"), contents).expect("write contents");

    let engine: Arc<dyn SearchEngine> = Arc::new(ScanEngine::new(SearchConfig::new(dir.path())));
    let worker = tokio::spawn(search_worker_loop(
        cmd_rx,
        resp_tx,
        engine,
        ResultAggregator::default(),
    ));

    (cmd_tx, resp_rx, worker, dir)
}

#[tokio::test]
async fn keyword_search_returns_page() {
    let (cmd_tx, mut resp_rx, worker, _dir) = spawn_worker(LOG).await;

    cmd_tx
        .send(SearchCommand::ExecuteSearch {
            request_id: 1,
            query: SearchQuery::keyword(window(), "Ann"),
        })
        .await
        .unwrap();

    match next_response(&mut resp_rx).await {
        SearchResponse::SearchCompleted {
            request_id, page, ..
        } => {
            assert_eq!(request_id, 1);
            assert!(!page.truncated);
            assert_eq!(page.chunks.len(), 1);
            let lines: Vec<&str> = page.chunks[0].lines().collect();
            assert_eq!(lines.len(), 3);
            assert!(lines.iter().all(|l| l.starts_with("01.03.2024 | ")));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    cmd_tx.send(SearchCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn dismantled_search_uses_first_and_third_coordinate() {
    let (cmd_tx, mut resp_rx, worker, _dir) = spawn_worker(LOG).await;

    cmd_tx
        .send(SearchCommand::ExecuteSearch {
            request_id: 7,
            query: SearchQuery::dismantled(window(), Point::new(400.0, 420.0), 1.0),
        })
        .await
        .unwrap();

    match next_response(&mut resp_rx).await {
        SearchResponse::SearchCompleted { page, .. } => {
            assert_eq!(page.chunks.len(), 1);
            assert!(page.chunks[0].contains("DISMANTLED Fence"));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    cmd_tx.send(SearchCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn rejected_query_reports_error() {
    let (cmd_tx, mut resp_rx, worker, _dir) = spawn_worker(LOG).await;

    cmd_tx
        .send(SearchCommand::ExecuteSearch {
            request_id: 3,
            query: SearchQuery::radius(window(), Point::new(0.0, 0.0), 101.0),
        })
        .await
        .unwrap();

    match next_response(&mut resp_rx).await {
        SearchResponse::Error { request_id, error } => {
            assert_eq!(request_id, 3);
            assert!(matches!(
                error,
                LogscopeError::Validation(ValidationError::RadiusExceedsCeiling { .. })
            ));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    cmd_tx.send(SearchCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn concurrent_requests_are_correlated_by_id() {
    let (cmd_tx, mut resp_rx, worker, _dir) = spawn_worker(LOG).await;

    cmd_tx
        .send(SearchCommand::ExecuteSearch {
            request_id: 10,
            query: SearchQuery::keyword(window(), "nobody-matches-this"),
        })
        .await
        .unwrap();
    cmd_tx
        .send(SearchCommand::ExecuteSearch {
            request_id: 11,
            query: SearchQuery::radius(window(), Point::new(12.0, 5.0), 1.0),
        })
        .await
        .unwrap();

    let mut pages = HashMap::new();
    for _ in 0..2 {
        match next_response(&mut resp_rx).await {
            SearchResponse::SearchCompleted {
                request_id, page, ..
            } => {
                pages.insert(request_id, page);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    assert!(pages[&10].is_empty());
    assert_eq!(pages[&11].chunks.len(), 1);
    assert!(pages[&11].chunks[0].contains("placed Fence"));

    cmd_tx.send(SearchCommand::Shutdown).await.unwrap();
    worker.await.unwrap();
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_searches() {
    let (cmd_tx, mut resp_rx, worker, _dir) = spawn_worker(LOG).await;

    cmd_tx
        .send(SearchCommand::ExecuteSearch {
            request_id: 1,
            query: SearchQuery::keyword(window(), "Fence"),
        })
        .await
        .unwrap();
    cmd_tx.send(SearchCommand::Shutdown).await.unwrap();

    match next_response(&mut resp_rx).await {
        SearchResponse::SearchCompleted { request_id, .. } => assert_eq!(request_id, 1),
        other => panic!("unexpected response: {other:?}"),
    }

    worker.await.unwrap();
    assert!(resp_rx.recv().await.is_none(), "worker should close its channel");
}

#[tokio::test]
async fn worker_exits_when_command_channel_closes() {
    let (cmd_tx, mut resp_rx, worker, _dir) = spawn_worker(LOG).await;
    drop(cmd_tx);

    timeout(Duration::from_millis(TIMEOUT_MS), worker)
        .await
        .expect("worker did not exit")
        .unwrap();
    assert!(resp_rx.recv().await.is_none());
}
