//! Expiry Purge Task
//!
//! Background task that periodically removes expired tables from a
//! [`MemoryStore`]. Lookups already treat expired tables as missing; the
//! task only reclaims their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a task purging expired tables every `interval_secs` seconds.
///
/// Returns the JoinHandle so the caller can abort the task on shutdown.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new();
/// let purge_handle = spawn_purge_task(store.clone(), 1);
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(store: MemoryStore, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry purge task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;
            if removed > 0 {
                info!("Expiry purge: removed {} expired tables", removed);
            } else {
                debug!("Expiry purge: no expired tables found");
            }
        }
    })
}
