//! Store Module
//!
//! Hash-table primitives of the remote key-value store and the providers that
//! hand out connections to it.
//!
//! A connection is released when it is dropped, so every scope that acquires
//! one gives it back on all exit paths.

mod memory;
mod remote;
mod table;

pub use memory::{MemoryConnection, MemoryStore};
pub use remote::{RedisConnection, RedisProvider};
pub use table::HashTable;

use async_trait::async_trait;

use crate::error::StoreResult;

// == Table TTL ==
/// TTL state of a remote hash table, as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTtl {
    /// No table with this name exists
    Missing,
    /// The table exists and never expires
    Persistent,
    /// The table expires in the given number of seconds
    Expires(u64),
}

impl TableTtl {
    /// Maps a Redis `TTL` reply (-2 missing, -1 persistent) onto a state.
    pub fn from_reply(reply: i64) -> Self {
        match reply {
            -2 => TableTtl::Missing,
            r if r < 0 => TableTtl::Persistent,
            r => TableTtl::Expires(r as u64),
        }
    }
}

// == Hash Connection ==
/// One short-lived handle to the store, addressing tables by name.
///
/// Each method is a single round trip and is atomic on the store side.
#[async_trait]
pub trait HashConnection: Send {
    /// Number of fields in the table, 0 when it does not exist.
    async fn field_count(&mut self, table: &str) -> StoreResult<usize>;

    /// Value of one field, `None` when the field or the table is absent.
    async fn field_get(&mut self, table: &str, field: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes one field, creating the table if needed.
    async fn field_set(&mut self, table: &str, field: &str, value: &[u8]) -> StoreResult<()>;

    /// Deletes one field and returns how many fields were removed.
    async fn field_delete(&mut self, table: &str, field: &str) -> StoreResult<u64>;

    /// Deletes the whole table along with its TTL.
    async fn table_delete(&mut self, table: &str) -> StoreResult<()>;

    async fn ttl(&mut self, table: &str) -> StoreResult<TableTtl>;

    /// Sets the table-wide TTL in seconds.
    async fn expire(&mut self, table: &str, seconds: u64) -> StoreResult<()>;
}

// == Connection Provider ==
/// Supplies connections to the store. Acquisition may wait or fail when the
/// provider is exhausted.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    type Connection: HashConnection;

    async fn acquire(&self) -> StoreResult<Self::Connection>;
}
