//! Redis Store
//!
//! Connection provider backed by the redis crate. Hash tables map onto Redis
//! hashes and the table-wide TTL onto the key's expiration.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::{ConnectionProvider, HashConnection, TableTtl};
use crate::error::{StoreError, StoreResult};

// == Redis Provider ==
/// Hands out handles onto one auto-reconnecting multiplexed connection.
///
/// Handles are cheap clones; dropping one releases it. Timeouts and
/// reconnection are left to the redis client.
#[derive(Clone)]
pub struct RedisProvider {
    manager: ConnectionManager,
}

impl RedisProvider {
    // == Constructor ==
    /// Opens a client for `url` and establishes the managed connection.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("Connected to Redis at {}", url);
        Ok(Self { manager })
    }
}

#[async_trait]
impl ConnectionProvider for RedisProvider {
    type Connection = RedisConnection;

    async fn acquire(&self) -> StoreResult<RedisConnection> {
        Ok(RedisConnection {
            conn: self.manager.clone(),
        })
    }
}

// == Redis Connection ==
/// One handle onto the managed Redis connection.
pub struct RedisConnection {
    conn: ConnectionManager,
}

#[async_trait]
impl HashConnection for RedisConnection {
    async fn field_count(&mut self, table: &str) -> StoreResult<usize> {
        Ok(self.conn.hlen(table).await?)
    }

    async fn field_get(&mut self, table: &str, field: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.conn.hget(table, field).await?)
    }

    async fn field_set(&mut self, table: &str, field: &str, value: &[u8]) -> StoreResult<()> {
        let _: i64 = self.conn.hset(table, field, value).await?;
        Ok(())
    }

    async fn field_delete(&mut self, table: &str, field: &str) -> StoreResult<u64> {
        Ok(self.conn.hdel(table, field).await?)
    }

    async fn table_delete(&mut self, table: &str) -> StoreResult<()> {
        let _: i64 = self.conn.del(table).await?;
        Ok(())
    }

    async fn ttl(&mut self, table: &str) -> StoreResult<TableTtl> {
        let reply: i64 = self.conn.ttl(table).await?;
        Ok(TableTtl::from_reply(reply))
    }

    async fn expire(&mut self, table: &str, seconds: u64) -> StoreResult<()> {
        let seconds = i64::try_from(seconds).map_err(|_| {
            StoreError::Command("invalid expire time in 'expire' command".to_string())
        })?;
        let _: i64 = self.conn.expire(table, seconds).await?;
        Ok(())
    }
}
