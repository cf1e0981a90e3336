//! TTL Memoizer
//!
//! Caches the result of a keyed computation for a fixed lifetime in a
//! bounded map, counting every request per key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

use super::{Clock, Fetch, InsertionOrder, MemoEntry, MemoStats, SystemClock};
use crate::error::Result;

// == Memo State ==
/// Everything guarded by the memoizer's lock.
#[derive(Debug)]
struct MemoState<V> {
    entries: HashMap<String, MemoEntry<V>>,
    order: InsertionOrder,
    stats: MemoStats,
    access_counts: HashMap<String, u64>,
}

impl<V> MemoState<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: MemoStats::new(),
            access_counts: HashMap::new(),
        }
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        self.order.remove(key);
    }

    fn purge_expired(&mut self, now_ms: u64) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        self.stats.record_expirations(expired.len());
        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    fn insert(&mut self, key: &str, value: V, now_ms: u64, ttl_ms: u64, max_entries: usize) {
        if !self.entries.contains_key(key) && self.entries.len() >= max_entries {
            // expired entries go first, then the oldest insertion
            self.purge_expired(now_ms);
            while self.entries.len() >= max_entries {
                match self.order.evict_oldest() {
                    Some(evicted) => {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                        debug!("Memo evicted {}", evicted);
                    }
                    None => break,
                }
            }
        }

        self.entries
            .insert(key.to_string(), MemoEntry::new(value, now_ms, ttl_ms));
        self.order.record(key);
        self.stats.set_total_entries(self.entries.len());
    }
}

// == TTL Memo ==
/// Memoizes a [`Fetch`] per key for a fixed time-to-live.
///
/// A fresh entry (`now - inserted < ttl`) is returned without recomputation;
/// an absent or expired one is recomputed and reinserted. At capacity, expired
/// entries are dropped first, then the oldest insertion. The per-key access
/// counter counts every `get`, hit or miss, and plays no part in eviction.
///
/// The computation runs outside the lock, so concurrent misses on one key may
/// each compute; the last result wins.
pub struct TtlMemo<F: Fetch> {
    fetcher: F,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_entries: usize,
    state: Mutex<MemoState<F::Output>>,
}

impl<F: Fetch> TtlMemo<F> {
    // == Constructor ==
    /// Creates a memoizer over `fetcher` using wall-clock time.
    ///
    /// # Arguments
    /// * `fetcher` - The computation to memoize
    /// * `ttl` - Lifetime of each cached result
    /// * `max_entries` - Capacity, at least one
    pub fn new(fetcher: F, ttl: Duration, max_entries: usize) -> Self {
        Self::with_clock(fetcher, ttl, max_entries, Arc::new(SystemClock))
    }

    /// Creates a memoizer reading time from `clock`.
    pub fn with_clock(fetcher: F, ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            clock,
            ttl,
            max_entries: max_entries.max(1),
            state: Mutex::new(MemoState::new()),
        }
    }

    // == Get ==
    /// Returns the value for `key`, computing it when absent or expired.
    ///
    /// Computation failures are returned and nothing is cached.
    pub async fn get(&self, key: &str) -> Result<F::Output> {
        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            *state.access_counts.entry(key.to_string()).or_insert(0) += 1;

            let now = self.clock.now_ms();
            let fresh = state
                .entries
                .get(key)
                .filter(|entry| !entry.is_expired(now))
                .map(|entry| entry.value.clone());

            if let Some(value) = fresh {
                state.stats.record_hit();
                debug!("Memo hit for {}", key);
                return Ok(value);
            }

            if state.entries.contains_key(key) {
                state.remove(key);
                state.stats.record_expirations(1);
                state.stats.set_total_entries(state.entries.len());
                debug!("Memo entry for {} expired", key);
            }
            state.stats.record_miss();
        }

        debug!("Memo miss for {}, computing", key);
        let value = self.fetcher.fetch(key).await?;

        let mut state = self.state.lock().await;
        let now = self.clock.now_ms();
        state.insert(
            key,
            value.clone(),
            now,
            self.ttl.as_millis() as u64,
            self.max_entries,
        );
        Ok(value)
    }

    // == Access Count ==
    /// Number of `get` calls made for `key`.
    pub async fn access_count(&self, key: &str) -> u64 {
        self.state
            .lock()
            .await
            .access_counts
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    // == Purge Expired ==
    /// Removes every expired entry, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now_ms();
        self.state.lock().await.purge_expired(now)
    }

    // == Stats ==
    /// Returns current memoizer statistics.
    pub async fn stats(&self) -> MemoStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of cached entries, expired or not.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Lifetime of each cached result.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::memo::ManualClock;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts invocations and returns `"<key>#<n>"` for the n-th one.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Counting {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetch for Counting {
        type Output = String;

        async fn fetch(&self, key: &str) -> Result<String> {
            if key == "boom" {
                return Err(CacheError::Fetch("boom".into()));
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("{}#{}", key, n))
        }
    }

    fn memo(ttl_secs: u64, max_entries: usize) -> (TtlMemo<Arc<Counting>>, Arc<Counting>, Arc<ManualClock>) {
        let fetcher = Arc::new(Counting::default());
        let clock = Arc::new(ManualClock::new(0));
        let memo = TtlMemo::with_clock(
            fetcher.clone(),
            Duration::from_secs(ttl_secs),
            max_entries,
            clock.clone(),
        );
        (memo, fetcher, clock)
    }

    #[tokio::test]
    async fn test_hit_within_ttl_and_recompute_after() {
        let (memo, fetcher, clock) = memo(10, 100);

        let first = memo.get("http://a").await.unwrap();

        clock.set(5_000);
        let second = memo.get("http://a").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);

        clock.set(11_000);
        let third = memo.get("http://a").await.unwrap();
        assert_ne!(first, third);
        assert_eq!(fetcher.calls(), 2);

        assert_eq!(memo.access_count("http://a").await, 3);
    }

    #[tokio::test]
    async fn test_expires_exactly_at_ttl() {
        let (memo, fetcher, clock) = memo(10, 100);

        memo.get("k").await.unwrap();
        clock.set(9_999);
        memo.get("k").await.unwrap();
        assert_eq!(fetcher.calls(), 1);

        clock.set(10_000);
        memo.get("k").await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_access_counts_are_per_key() {
        let (memo, _, _) = memo(10, 100);

        memo.get("a").await.unwrap();
        memo.get("a").await.unwrap();
        memo.get("b").await.unwrap();

        assert_eq!(memo.access_count("a").await, 2);
        assert_eq!(memo.access_count("b").await, 1);
        assert_eq!(memo.access_count("never").await, 0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_insertion() {
        let (memo, fetcher, _) = memo(60, 2);

        memo.get("a").await.unwrap();
        memo.get("b").await.unwrap();
        // reads do not refresh insertion order
        memo.get("a").await.unwrap();
        memo.get("c").await.unwrap();

        assert_eq!(memo.len().await, 2);
        assert_eq!(memo.stats().await.evictions, 1);

        // "a" was evicted and must be recomputed, "b" is still cached
        memo.get("b").await.unwrap();
        assert_eq!(fetcher.calls(), 3);
        memo.get("a").await.unwrap();
        assert_eq!(fetcher.calls(), 4);
    }

    #[tokio::test]
    async fn test_capacity_drops_expired_before_evicting() {
        let (memo, _, clock) = memo(10, 2);

        memo.get("old").await.unwrap();
        clock.set(8_000);
        memo.get("young").await.unwrap();

        clock.set(12_000);
        memo.get("new").await.unwrap();

        let stats = memo.stats().await;
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached_but_is_counted() {
        let (memo, _, _) = memo(10, 100);

        assert!(matches!(memo.get("boom").await, Err(CacheError::Fetch(_))));
        assert!(memo.get("boom").await.is_err());

        assert!(memo.is_empty().await);
        assert_eq!(memo.access_count("boom").await, 2);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (memo, _, clock) = memo(10, 100);

        memo.get("a").await.unwrap();
        clock.set(5_000);
        memo.get("b").await.unwrap();

        clock.set(12_000);
        assert_eq!(memo.purge_expired().await, 1);
        assert_eq!(memo.len().await, 1);

        // purging does not touch access counters
        assert_eq!(memo.access_count("a").await, 1);
    }

    #[tokio::test]
    async fn test_stats() {
        let (memo, _, clock) = memo(10, 100);

        memo.get("a").await.unwrap();
        memo.get("a").await.unwrap();
        clock.set(20_000);
        memo.get("a").await.unwrap();

        let stats = memo.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let (memo, fetcher, _) = memo(10, 0);

        memo.get("a").await.unwrap();
        memo.get("a").await.unwrap();

        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_gets_never_lose_counts() {
        let fetcher = Arc::new(Counting::default());
        let memo = Arc::new(TtlMemo::new(fetcher, Duration::from_secs(60), 10));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let memo = memo.clone();
            handles.push(tokio::spawn(async move { memo.get("shared").await.unwrap() }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(memo.access_count("shared").await, 50);
        assert_eq!(memo.ttl(), Duration::from_secs(60));
    }
}
