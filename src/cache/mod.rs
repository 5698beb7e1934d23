//! Cache Module
//!
//! Query-result cache stored in remote hash tables, one table per cache name.

mod adapter;
mod factory;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use adapter::HashCache;
pub use factory::{
    is_false_flag, CacheFactory, CacheFactoryBuilder, Properties, ENABLED_PROPERTY,
};

// == Public Constants ==
/// Largest cache TTL in seconds, the range of a Redis `EXPIRE` argument
pub const MAX_TTL_SECONDS: u64 = i64::MAX as u64;
