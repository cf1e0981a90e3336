//! Backend Module
//!
//! The key-value capability the cache and recorder are built on: raw byte
//! values, atomic counters and append-only lists in one keyspace.

mod memory;

use async_trait::async_trait;

use crate::error::{CacheError, Result};

pub use memory::MemoryStore;

// == Store Trait ==
/// Key-value backend consumed by the cache, the call recorder and replay.
///
/// Implementations must make `incr` and `rpush` atomic; callers issue one
/// backend call per logical step and never wrap several calls in a transaction.
#[async_trait]
pub trait Store: Send + Sync {
    /// Writes `value` under `key`, replacing whatever was there.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Reads the raw bytes under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Atomically increments the integer counter at `key`, returning the new value.
    ///
    /// A missing key starts from zero.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Atomically appends `value` to the tail of the list at `key`,
    /// returning the new list length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns list elements between `start` and `end`, both inclusive.
    ///
    /// Negative indices count from the tail, so `(0, -1)` is the whole list.
    async fn lrange(&self, key: &str, start: i64, end: i64) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    async fn flush_all(&self) -> Result<()>;

    /// Reads a counter written by `incr`, zero when it was never incremented.
    async fn get_count(&self, key: &str) -> Result<i64> {
        match self.get(key).await? {
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CacheError::Backend(format!("value at '{}' is not a counter", key))),
            None => Ok(0),
        }
    }
}
