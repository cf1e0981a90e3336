//! Memo Entry Module
//!
//! Defines a memoized result together with its insertion and expiry times.

// == Memo Entry ==
/// A cached computation result with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct MemoEntry<V> {
    /// The cached value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> MemoEntry<V> {
    // == Constructor ==
    /// Creates an entry inserted at `now_ms` that lives for `ttl_ms`.
    pub fn new(value: V, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            inserted_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is expired once `now - inserted_at >= ttl`,
    /// so it is fresh strictly before its expiry instant.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
