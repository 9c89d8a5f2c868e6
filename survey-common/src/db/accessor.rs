//! Response store accessor: fetch-or-reuse over an injected cache

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::cache::{CachedSnapshot, SnapshotCache};
use super::store::{FixedQuery, ResponseStore};
use crate::snapshot::Snapshot;
use crate::{Error, Result};

/// Upper bound on one store call unless configured otherwise
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Hands out snapshots, contacting the store only when the cached one is stale
///
/// - Inside the freshness window the remembered snapshot is returned as-is.
/// - Re-fetches for the same query are serialized; late callers reuse the
///   result of the fetch they waited on.
/// - Failures are returned immediately and never cached.
/// - A store call running longer than the fetch timeout is abandoned and
///   reported as a connection error, so waiters are never stuck behind it.
/// - Non-empty snapshots are checked against `expected_columns` before they
///   are remembered.
pub struct ResponseAccessor {
    store: Arc<dyn ResponseStore>,
    cache: Arc<SnapshotCache>,
    expected_columns: Vec<String>,
    fetch_timeout: Duration,
}

impl ResponseAccessor {
    pub fn new(
        store: Arc<dyn ResponseStore>,
        cache: Arc<SnapshotCache>,
        expected_columns: Vec<String>,
    ) -> Self {
        Self {
            store,
            cache,
            expected_columns,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Snapshot for `query`, fetched now or reused
    pub async fn fetch(&self, query: FixedQuery) -> Result<Arc<Snapshot>> {
        self.fetch_at(query, Instant::now()).await
    }

    /// [`Self::fetch`] with an explicit clock reading
    pub async fn fetch_at(&self, query: FixedQuery, now: Instant) -> Result<Arc<Snapshot>> {
        let slot = self.cache.slot(query).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(now, self.cache.freshness_window()) {
                debug!("Reusing cached snapshot for {}", query);
                return Ok(Arc::clone(&cached.snapshot));
            }
            debug!("Cached snapshot for {} expired", query);
        }

        info!("Fetching {} from response store", query);
        let outcome = match tokio::time::timeout(self.fetch_timeout, self.store.run(query)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::Connection(format!(
                "Timed out after {:?} fetching {}",
                self.fetch_timeout, query
            ))),
        };
        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Fetch of {} failed: {}", query, e);
                return Err(e);
            }
        };

        if !snapshot.is_empty() {
            snapshot.require_columns(&self.expected_columns)?;
        }

        info!(
            "Fetched {} row(s), {} column(s) for {}",
            snapshot.row_count(),
            snapshot.columns().len(),
            query
        );

        let snapshot = Arc::new(snapshot);
        *entry = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            fetched: now,
        });
        Ok(snapshot)
    }

    /// Drop the cached snapshot for `query`
    pub async fn invalidate(&self, query: FixedQuery) {
        info!("Invalidating cached snapshot for {}", query);
        self.cache.invalidate(query).await;
    }
}
