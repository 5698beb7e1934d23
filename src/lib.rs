//! Redis Query Cache - A second-level ORM query cache in Redis hash tables
//!
//! Each logical cache lives in one remote hash table named after the cache.
//! Values go through a pluggable codec and an optional cache-wide TTL is set
//! once, on the first write to a table that has none.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;
pub mod tasks;

pub use cache::{CacheFactory, HashCache, Properties};
pub use codec::{Codec, JsonCodec};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{ConnectionProvider, MemoryStore, RedisProvider};
pub use tasks::spawn_purge_task;
