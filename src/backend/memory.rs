//! In-Memory Backend
//!
//! A process-local `Store` with Redis-like semantics, shared behind a lock.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::Store;
use crate::error::{CacheError, Result};

// == Slot ==
/// A single keyspace slot: either a plain value or a list.
#[derive(Debug, Clone)]
enum Slot {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Memory Store ==
/// In-memory backend holding every slot in one map.
///
/// Each trait call takes the lock exactly once, which is what makes
/// `incr` and `rpush` atomic with respect to concurrent callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<String, Slot>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of keys currently held.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if no keys are held.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

fn wrong_type(key: &str) -> CacheError {
    CacheError::Backend(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}

/// Resolves a Redis-style inclusive range against a list of `len` items.
fn resolve_range(len: usize, start: i64, end: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { len + end } else { end.min(len - 1) };

    if len == 0 || start > end || start >= len {
        None
    } else {
        Some((start as usize, end as usize))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), Slot::Bytes(value));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.slots.read().await.get(key) {
            Some(Slot::Bytes(value)) => Ok(Some(value.clone())),
            Some(Slot::List(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut slots = self.slots.write().await;
        let current = match slots.get(key) {
            Some(Slot::Bytes(raw)) => std::str::from_utf8(raw)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| {
                    CacheError::Backend(format!("value at '{}' is not an integer", key))
                })?,
            Some(Slot::List(_)) => return Err(wrong_type(key)),
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::Backend(format!("increment would overflow '{}'", key)))?;
        slots.insert(key.to_string(), Slot::Bytes(next.to_string().into_bytes()));
        Ok(next)
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut slots = self.slots.write().await;
        match slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::List(Vec::new()))
        {
            Slot::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            Slot::Bytes(_) => Err(wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str, start: i64, end: i64) -> Result<Vec<Vec<u8>>> {
        match self.slots.read().await.get(key) {
            Some(Slot::List(items)) => Ok(resolve_range(items.len(), start, end)
                .map(|(from, to)| items[from..=to].to_vec())
                .unwrap_or_default()),
            Some(Slot::Bytes(_)) => Err(wrong_type(key)),
            None => Ok(Vec::new()),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        let mut slots = self.slots.write().await;
        let removed = slots.len();
        slots.clear();
        debug!("Backend flushed: removed {} keys", removed);
        Ok(())
    }
}
