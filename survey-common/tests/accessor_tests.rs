//! Integration tests for the response accessor and its snapshot cache
//!
//! Tests cover:
//! - Reuse inside the freshness window, re-fetch after it
//! - Failures surfaced immediately and never cached
//! - Schema validation at ingestion
//! - One store call for concurrent fetches of the same query
//! - A store that never answers is cut off by the fetch timeout

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use survey_common::columns::EXPECTED_COLUMNS;
use survey_common::db::{FixedQuery, ResponseAccessor, ResponseStore, SnapshotCache};
use survey_common::{CellValue, Error, Result, Snapshot};

/// Store double that counts calls and replays scripted outcomes
struct CountingStore {
    calls: AtomicUsize,
    failures_left: Mutex<usize>,
    delay: Duration,
    snapshot: fn() -> Snapshot,
}

impl CountingStore {
    fn new(snapshot: fn() -> Snapshot) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failures_left: Mutex::new(0),
            delay: Duration::ZERO,
            snapshot,
        }
    }

    fn failing_first(self, failures: usize) -> Self {
        *self.failures_left.lock().unwrap() = failures;
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseStore for CountingStore {
    async fn run(&self, _query: FixedQuery) -> Result<Snapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        {
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::Connection("connection refused".to_string()));
            }
        }
        Ok((self.snapshot)())
    }
}

/// Store whose query never completes
struct HangingStore;

#[async_trait]
impl ResponseStore for HangingStore {
    async fn run(&self, _query: FixedQuery) -> Result<Snapshot> {
        std::future::pending().await
    }
}

fn full_snapshot() -> Snapshot {
    let columns = EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let row = EXPECTED_COLUMNS
        .iter()
        .map(|c| CellValue::Text(format!("{}-value", c)))
        .collect();
    Snapshot::new(columns, vec![row]).unwrap()
}

fn partial_snapshot() -> Snapshot {
    Snapshot::new(
        vec!["university".to_string()],
        vec![vec![CellValue::from("UFBA")]],
    )
    .unwrap()
}

fn accessor(store: Arc<CountingStore>) -> ResponseAccessor {
    ResponseAccessor::new(
        store,
        Arc::new(SnapshotCache::new(Duration::from_secs(600))),
        EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
    )
}

#[tokio::test]
async fn test_store_queried_once_inside_window_and_again_after() {
    let store = Arc::new(CountingStore::new(full_snapshot));
    let accessor = accessor(Arc::clone(&store));
    let t0 = Instant::now();

    let first = accessor.fetch_at(FixedQuery::AllResponses, t0).await.unwrap();
    let second = accessor
        .fetch_at(FixedQuery::AllResponses, t0 + Duration::from_secs(300))
        .await
        .unwrap();

    assert_eq!(store.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second), "Should reuse the cached snapshot");

    let third = accessor
        .fetch_at(FixedQuery::AllResponses, t0 + Duration::from_secs(601))
        .await
        .unwrap();

    assert_eq!(store.calls(), 2);
    assert!(!Arc::ptr_eq(&first, &third));
}

#[tokio::test]
async fn test_failure_is_not_cached() {
    let store = Arc::new(CountingStore::new(full_snapshot).failing_first(1));
    let accessor = accessor(Arc::clone(&store));
    let t0 = Instant::now();

    let result = accessor.fetch_at(FixedQuery::AllResponses, t0).await;
    assert!(matches!(result, Err(Error::Connection(_))));

    let retry = accessor.fetch_at(FixedQuery::AllResponses, t0).await;
    assert!(retry.is_ok());
    assert_eq!(store.calls(), 2, "Failed fetch must not be remembered");
}

#[tokio::test]
async fn test_missing_columns_rejected_at_ingestion() {
    let store = Arc::new(CountingStore::new(partial_snapshot));
    let accessor = accessor(Arc::clone(&store));

    match accessor.fetch(FixedQuery::AllResponses).await {
        Err(Error::Schema { missing }) => {
            assert_eq!(missing.len(), EXPECTED_COLUMNS.len() - 1);
            assert!(missing.contains(&"course".to_string()));
        }
        other => panic!("expected schema error, got {:?}", other.map(|s| s.row_count())),
    }

    // Not cached either
    let _ = accessor.fetch(FixedQuery::AllResponses).await;
    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_empty_snapshot_skips_schema_check_and_is_cached() {
    let store = Arc::new(CountingStore::new(Snapshot::empty));
    let accessor = accessor(Arc::clone(&store));

    let snapshot = accessor.fetch(FixedQuery::AllResponses).await.unwrap();
    assert!(snapshot.is_empty());

    let again = accessor.fetch(FixedQuery::AllResponses).await.unwrap();
    assert!(again.is_empty());
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let store = Arc::new(CountingStore::new(full_snapshot));
    let accessor = accessor(Arc::clone(&store));

    accessor.fetch(FixedQuery::AllResponses).await.unwrap();
    accessor.invalidate(FixedQuery::AllResponses).await;
    accessor.fetch(FixedQuery::AllResponses).await.unwrap();

    assert_eq!(store.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_fetches_hit_store_once() {
    let store = Arc::new(CountingStore::new(full_snapshot).with_delay(Duration::from_millis(50)));
    let accessor = Arc::new(accessor(Arc::clone(&store)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let accessor = Arc::clone(&accessor);
            tokio::spawn(async move { accessor.fetch(FixedQuery::AllResponses).await })
        })
        .collect();

    for handle in handles {
        let snapshot = handle.await.unwrap().unwrap();
        assert_eq!(snapshot.row_count(), 1);
    }

    assert_eq!(store.calls(), 1);
}

fn hanging_accessor() -> Arc<ResponseAccessor> {
    Arc::new(
        ResponseAccessor::new(
            Arc::new(HangingStore),
            Arc::new(SnapshotCache::new(Duration::from_secs(600))),
            EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        )
        .with_fetch_timeout(Duration::from_millis(300)),
    )
}

#[tokio::test]
async fn test_hung_store_reported_as_timeout() {
    let accessor = hanging_accessor();

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        accessor.fetch(FixedQuery::AllResponses),
    )
    .await
    .expect("fetch should be bounded by the fetch timeout");

    match result {
        Err(Error::Connection(msg)) => assert!(msg.contains("Timed out"), "{}", msg),
        other => panic!("expected timeout, got {:?}", other.map(|s| s.row_count())),
    }
}

#[tokio::test]
async fn test_hung_fetch_does_not_block_invalidate_or_later_fetches() {
    let accessor = hanging_accessor();

    let in_flight = {
        let accessor = Arc::clone(&accessor);
        tokio::spawn(async move { accessor.fetch(FixedQuery::AllResponses).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    tokio::time::timeout(
        Duration::from_secs(2),
        accessor.invalidate(FixedQuery::AllResponses),
    )
    .await
    .expect("invalidate should not wait for the fetch in progress");

    let later = tokio::time::timeout(
        Duration::from_secs(2),
        accessor.fetch(FixedQuery::AllResponses),
    )
    .await
    .expect("later fetch should return");
    assert!(matches!(later, Err(Error::Connection(_))));

    let first = in_flight.await.unwrap();
    assert!(matches!(first, Err(Error::Connection(_))));
}
