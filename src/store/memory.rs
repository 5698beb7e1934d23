//! In-Memory Store
//!
//! In-process stand-in for the remote store. Tables follow Redis hash
//! semantics: empty tables disappear, deleting a table drops its TTL, and
//! expired tables read as missing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ConnectionProvider, HashConnection, HashTable, TableTtl};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    tables: RwLock<HashMap<String, HashTable>>,
    /// Connections handed out and not yet dropped
    outstanding: AtomicUsize,
    /// Connections handed out since creation
    acquired: AtomicUsize,
    fail_acquire: AtomicBool,
    fail_commands: AtomicBool,
}

// == Memory Store ==
/// Shared in-process hash-table store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections currently checked out.
    pub fn outstanding_connections(&self) -> usize {
        self.inner.outstanding.load(Ordering::SeqCst)
    }

    /// Number of connections handed out over the store's lifetime.
    pub fn acquired_connections(&self) -> usize {
        self.inner.acquired.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `acquire` fail until switched off.
    pub fn set_fail_acquire(&self, fail: bool) {
        self.inner.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent command fail until switched off.
    pub fn set_fail_commands(&self, fail: bool) {
        self.inner.fail_commands.store(fail, Ordering::SeqCst);
    }

    /// Number of live (non-expired) tables.
    pub async fn table_count(&self) -> usize {
        let tables = self.inner.tables.read().await;
        tables.values().filter(|t| !t.is_expired()).count()
    }

    // == Purge Expired ==
    /// Removes all expired tables.
    ///
    /// Returns the number of tables removed.
    pub async fn purge_expired(&self) -> usize {
        let mut tables = self.inner.tables.write().await;
        let before = tables.len();
        tables.retain(|_, table| !table.is_expired());
        before - tables.len()
    }
}

#[async_trait]
impl ConnectionProvider for MemoryStore {
    type Connection = MemoryConnection;

    async fn acquire(&self) -> StoreResult<MemoryConnection> {
        if self.inner.fail_acquire.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store refused the connection".to_string(),
            ));
        }

        self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
        self.inner.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryConnection {
            inner: self.inner.clone(),
        })
    }
}

// == Memory Connection ==
/// Connection handle into a [`MemoryStore`]; released on drop.
#[derive(Debug)]
pub struct MemoryConnection {
    inner: Arc<Inner>,
}

impl MemoryConnection {
    fn check(&self, command: &str) -> StoreResult<()> {
        if self.inner.fail_commands.load(Ordering::SeqCst) {
            return Err(StoreError::Command(format!("{} rejected", command)));
        }
        Ok(())
    }
}

impl Drop for MemoryConnection {
    fn drop(&mut self) {
        self.inner.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Returns the table unless it is absent or expired.
fn live<'a>(tables: &'a HashMap<String, HashTable>, name: &str) -> Option<&'a HashTable> {
    tables.get(name).filter(|t| !t.is_expired())
}

/// Drops the table if it has expired, then returns what is left.
fn live_mut<'a>(
    tables: &'a mut HashMap<String, HashTable>,
    name: &str,
) -> Option<&'a mut HashTable> {
    if tables.get(name).is_some_and(HashTable::is_expired) {
        debug!("Dropping expired table [{}]", name);
        tables.remove(name);
    }
    tables.get_mut(name)
}

#[async_trait]
impl HashConnection for MemoryConnection {
    async fn field_count(&mut self, table: &str) -> StoreResult<usize> {
        self.check("HLEN")?;
        let tables = self.inner.tables.read().await;
        Ok(live(&tables, table).map_or(0, |t| t.fields.len()))
    }

    async fn field_get(&mut self, table: &str, field: &str) -> StoreResult<Option<Vec<u8>>> {
        self.check("HGET")?;
        let tables = self.inner.tables.read().await;
        Ok(live(&tables, table).and_then(|t| t.fields.get(field).cloned()))
    }

    async fn field_set(&mut self, table: &str, field: &str, value: &[u8]) -> StoreResult<()> {
        self.check("HSET")?;
        let mut tables = self.inner.tables.write().await;
        if live_mut(&mut tables, table).is_none() {
            tables.insert(table.to_string(), HashTable::new());
        }
        if let Some(t) = tables.get_mut(table) {
            t.fields.insert(field.to_string(), value.to_vec());
        }
        Ok(())
    }

    async fn field_delete(&mut self, table: &str, field: &str) -> StoreResult<u64> {
        self.check("HDEL")?;
        let mut tables = self.inner.tables.write().await;
        let Some(t) = live_mut(&mut tables, table) else {
            return Ok(0);
        };
        let removed = t.fields.remove(field).is_some();
        if t.fields.is_empty() {
            tables.remove(table);
        }
        Ok(u64::from(removed))
    }

    async fn table_delete(&mut self, table: &str) -> StoreResult<()> {
        self.check("DEL")?;
        self.inner.tables.write().await.remove(table);
        Ok(())
    }

    async fn ttl(&mut self, table: &str) -> StoreResult<TableTtl> {
        self.check("TTL")?;
        let tables = self.inner.tables.read().await;
        Ok(match live(&tables, table) {
            None => TableTtl::Missing,
            Some(t) => t
                .ttl_remaining()
                .map_or(TableTtl::Persistent, TableTtl::Expires),
        })
    }

    async fn expire(&mut self, table: &str, seconds: u64) -> StoreResult<()> {
        self.check("EXPIRE")?;
        let mut tables = self.inner.tables.write().await;
        if seconds == 0 {
            tables.remove(table);
        } else if let Some(t) = live_mut(&mut tables, table) {
            if !t.expire_in(seconds) {
                return Err(StoreError::Command(
                    "invalid expire time in 'expire' command".to_string(),
                ));
            }
        }
        Ok(())
    }
}
