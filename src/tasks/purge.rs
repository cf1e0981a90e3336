//! Memo Purge Task
//!
//! Background task that periodically drops expired memoized results so the
//! memoizer does not hold stale pages until their key is requested again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::memo::{Fetch, TtlMemo};

/// Spawns a background task that periodically purges expired memo entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between purge runs.
///
/// # Arguments
/// * `memo` - Shared memoizer to purge
/// * `interval_secs` - Interval in seconds between purge runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let memo = Arc::new(TtlMemo::new(fetcher, Duration::from_secs(10), 100));
/// let purge_handle = spawn_purge_task(memo.clone(), 1);
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task<F>(memo: Arc<TtlMemo<F>>, interval_secs: u64) -> JoinHandle<()>
where
    F: Fetch + 'static,
{
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting memo purge task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = memo.purge_expired().await;

            if removed > 0 {
                info!("Memo purge: removed {} expired entries", removed);
            } else {
                debug!("Memo purge: no expired entries found");
            }
        }
    })
}
