//! Hash Cache Adapter
//!
//! Maps one named logical cache onto one remote hash table of the same name.
//! Keys are stored by their string form, values through the codec, and the
//! optional cache-wide TTL is applied to the table once, on the first write
//! that finds it without one.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::MAX_TTL_SECONDS;
use crate::codec::Codec;
use crate::error::{CacheError, Result};
use crate::store::{ConnectionProvider, HashConnection, TableTtl};

// == Hash Cache ==
/// Query cache backed by a single remote hash table.
///
/// The adapter keeps no entry state of its own. Each operation acquires one
/// connection, performs its round trip (two for `put` when a TTL is
/// configured) and drops the connection before returning.
///
/// `get`/`size` share a process-local read lock; `put`/`remove`/`clear` take
/// it exclusively so a `clear` cannot land between the TTL check and the TTL
/// set of a `put`.
pub struct HashCache<P, C> {
    /// Cache name, also the remote table name
    id: String,
    /// Cache-wide TTL in seconds, None = entries never expire
    ttl: Option<u64>,
    provider: Arc<P>,
    codec: Arc<C>,
    lock: RwLock<()>,
}

impl<P, C> HashCache<P, C>
where
    P: ConnectionProvider,
    C: Codec,
{
    // == Constructor ==
    /// Creates an adapter for the cache named `id`.
    ///
    /// Fails with a validation error, without touching the store, when the
    /// name is empty or the TTL is zero or above [`MAX_TTL_SECONDS`].
    pub fn new(
        id: impl Into<String>,
        provider: Arc<P>,
        ttl: Option<u64>,
        codec: Arc<C>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CacheError::Validation("Id must not be empty.".to_string()));
        }
        if let Some(secs) = ttl {
            if secs == 0 || secs > MAX_TTL_SECONDS {
                return Err(CacheError::Validation(format!(
                    "TTL of cache [{}] must be between 1 and {} seconds, got {}.",
                    id, MAX_TTL_SECONDS, secs
                )));
            }
        }

        Ok(Self {
            id,
            ttl,
            provider,
            codec,
            lock: RwLock::new(()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ttl(&self) -> Option<u64> {
        self.ttl
    }

    // == Size ==
    /// Returns the number of entries, 0 when the table does not exist.
    pub async fn size(&self) -> Result<usize> {
        debug!("Getting cache size of [{}]...", self.id);
        let _guard = self.lock.read().await;
        let mut conn = self.provider.acquire().await?;
        Ok(conn.field_count(&self.id).await?)
    }

    // == Put ==
    /// Stores `value` under the string form of `key`.
    ///
    /// After the write, the table TTL is set only if one is configured and the
    /// table currently has none. Later writes leave a running TTL untouched.
    /// If the TTL round trip fails the value stays cached without expiry.
    pub async fn put<K, V>(&self, key: &K, value: &V) -> Result<()>
    where
        K: Display + ?Sized,
        V: Serialize + ?Sized,
    {
        let field = key.to_string();
        debug!("Putting cache [{}] with key [{}]...", self.id, field);
        let _guard = self.lock.write().await;
        let mut conn = self.provider.acquire().await?;

        let bytes = self.serialize(value)?;
        conn.field_set(&self.id, &field, &bytes).await?;

        if let Some(ttl) = self.ttl {
            if conn.ttl(&self.id).await? == TableTtl::Persistent {
                debug!("Setting TTL of cache [{}] to {}s", self.id, ttl);
                conn.expire(&self.id, ttl).await?;
            }
        }
        Ok(())
    }

    // == Get ==
    /// Reads the entry stored under the string form of `key`.
    ///
    /// Returns `Ok(None)` when no such entry exists.
    pub async fn get<K, V>(&self, key: &K) -> Result<Option<V>>
    where
        K: Display + ?Sized,
        V: DeserializeOwned,
    {
        let field = key.to_string();
        debug!("Getting cache [{}] with key [{}]...", self.id, field);
        let _guard = self.lock.read().await;
        let mut conn = self.provider.acquire().await?;

        match conn.field_get(&self.id, &field).await? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    // == Remove ==
    /// Deletes one entry and returns how many entries were removed (0 or 1).
    pub async fn remove<K>(&self, key: &K) -> Result<u64>
    where
        K: Display + ?Sized,
    {
        let field = key.to_string();
        debug!("Removing cache [{}] with key [{}]...", self.id, field);
        let _guard = self.lock.write().await;
        let mut conn = self.provider.acquire().await?;
        Ok(conn.field_delete(&self.id, &field).await?)
    }

    // == Clear ==
    /// Deletes the whole table, its TTL included.
    pub async fn clear(&self) -> Result<()> {
        debug!("Clearing cache [{}]...", self.id);
        let _guard = self.lock.write().await;
        let mut conn = self.provider.acquire().await?;
        conn.table_delete(&self.id).await?;
        Ok(())
    }

    fn serialize<V>(&self, value: &V) -> Result<Vec<u8>>
    where
        V: Serialize + ?Sized,
    {
        debug!("Serializing value for cache [{}]...", self.id);
        Ok(self.codec.serialize(value)?)
    }

    fn deserialize<V>(&self, bytes: &[u8]) -> Result<V>
    where
        V: DeserializeOwned,
    {
        debug!(
            "Deserializing {} bytes for cache [{}]...",
            bytes.len(),
            self.id
        );
        Ok(self.codec.deserialize(bytes)?)
    }
}

impl<P, C> fmt::Debug for HashCache<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashCache")
            .field("id", &self.id)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
