//! kvtrace - An instrumented key-value cache
//!
//! Stores values under generated keys, counts and records calls to
//! instrumented operations so they can be replayed, and memoizes slow
//! keyed fetches for a bounded time.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod memo;
pub mod models;
pub mod recorder;
pub mod tasks;

pub use api::AppState;
pub use backend::{MemoryStore, Store};
pub use cache::{Cache, Value};
pub use config::Config;
pub use error::{CacheError, Result};
pub use memo::{Fetch, TtlMemo};
pub use recorder::{replay, Operation, OperationExt};
pub use tasks::spawn_purge_task;
