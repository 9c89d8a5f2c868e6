//! Time-boxed snapshot cache
//!
//! Owns one slot per [`FixedQuery`]. Each slot is guarded by its own async
//! mutex; the accessor holds that lock across a re-fetch so concurrent
//! callers for the same query wait for one fetch instead of racing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::store::FixedQuery;
use crate::snapshot::Snapshot;

/// A remembered snapshot and when it was fetched
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub snapshot: Arc<Snapshot>,
    pub fetched: Instant,
}

impl CachedSnapshot {
    /// Still inside `window` at `now`
    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.fetched) < window
    }
}

pub(crate) type Slot = Arc<Mutex<Option<CachedSnapshot>>>;

/// Query identifier → (snapshot, fetch time)
#[derive(Debug)]
pub struct SnapshotCache {
    freshness_window: Duration,
    slots: Mutex<HashMap<FixedQuery, Slot>>,
}

impl SnapshotCache {
    pub fn new(freshness_window: Duration) -> Self {
        Self {
            freshness_window,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Slot for `query`, created empty on first use
    pub(crate) async fn slot(&self, query: FixedQuery) -> Slot {
        let mut slots = self.slots.lock().await;
        slots.entry(query).or_default().clone()
    }

    /// Forget `query`; the next fetch goes to the store
    ///
    /// The slot is replaced rather than cleared, so this never waits behind
    /// a fetch in progress. That fetch still answers its own callers.
    pub async fn invalidate(&self, query: FixedQuery) {
        self.slots.lock().await.insert(query, Slot::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn is_fresh_at(cache: &SnapshotCache, now: Instant) -> bool {
        let slot = cache.slot(FixedQuery::AllResponses).await;
        let entry = slot.lock().await;
        entry
            .as_ref()
            .is_some_and(|cached| cached.is_fresh(now, cache.freshness_window()))
    }

    #[tokio::test]
    async fn test_empty_cache_has_nothing_fresh() {
        let cache = SnapshotCache::new(Duration::from_secs(600));
        assert!(!is_fresh_at(&cache, Instant::now()).await);
    }

    #[tokio::test]
    async fn test_entry_expires_after_window() {
        let cache = SnapshotCache::new(Duration::from_secs(600));
        let t0 = Instant::now();
        {
            let slot = cache.slot(FixedQuery::AllResponses).await;
            *slot.lock().await = Some(CachedSnapshot {
                snapshot: Arc::new(Snapshot::empty()),
                fetched: t0,
            });
        }

        let inside = t0 + Duration::from_secs(599);
        let outside = t0 + Duration::from_secs(600);
        assert!(is_fresh_at(&cache, inside).await);
        assert!(!is_fresh_at(&cache, outside).await);
    }

    #[tokio::test]
    async fn test_invalidate_clears_entry() {
        let cache = SnapshotCache::new(Duration::from_secs(600));
        let t0 = Instant::now();
        {
            let slot = cache.slot(FixedQuery::AllResponses).await;
            *slot.lock().await = Some(CachedSnapshot {
                snapshot: Arc::new(Snapshot::empty()),
                fetched: t0,
            });
        }
        cache.invalidate(FixedQuery::AllResponses).await;
        assert!(!is_fresh_at(&cache, t0).await);
    }

    #[tokio::test]
    async fn test_invalidate_does_not_wait_for_locked_slot() {
        let cache = SnapshotCache::new(Duration::from_secs(600));
        let slot = cache.slot(FixedQuery::AllResponses).await;
        let _held = slot.lock().await;

        tokio::time::timeout(
            Duration::from_secs(1),
            cache.invalidate(FixedQuery::AllResponses),
        )
        .await
        .expect("invalidate should not wait for the slot lock");

        // A fresh slot is handed out while the old one is still locked
        let replaced = cache.slot(FixedQuery::AllResponses).await;
        assert!(!Arc::ptr_eq(&slot, &replaced));
        assert!(replaced.try_lock().is_ok());
    }

    #[test]
    fn test_is_fresh_tolerates_earlier_now() {
        let fetched = Instant::now();
        let cached = CachedSnapshot {
            snapshot: Arc::new(Snapshot::empty()),
            fetched: fetched + Duration::from_secs(5),
        };
        assert!(cached.is_fresh(fetched, Duration::from_secs(1)));
    }
}
