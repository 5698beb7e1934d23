//! Configuration Module
//!
//! Handles loading the cache configuration from environment variables.

use std::env;

use crate::cache::{is_false_flag, Properties, ENABLED_PROPERTY};

/// Store backing the caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Remote Redis server
    Redis,
    /// In-process store, for local runs without a server
    Memory,
}

impl Backend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Backend::Redis),
            "memory" => Some(Backend::Memory),
            _ => None,
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL
    pub redis_url: String,
    /// TTL in seconds for caches created without one, None = never expire
    pub default_ttl: Option<u64>,
    /// Store backing the caches
    pub backend: Backend,
    /// Purge interval in seconds for the in-memory backend
    pub purge_interval: u64,
    /// Whether caches may be created at all
    pub enabled: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: none; 0 = none)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `PURGE_INTERVAL` - In-memory purge frequency in seconds (default: 1)
    /// - `CACHE_ENABLED` - `false`, `0`, `no` or `off` disables cache creation (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl: &u64| *ttl > 0),
            backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| Backend::parse(&v))
                .unwrap_or(defaults.backend),
            purge_interval: env::var("PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval),
            enabled: parse_enabled(env::var("CACHE_ENABLED").ok(), defaults.enabled),
        }
    }

    /// Property bag passed to the cache factory.
    pub fn properties(&self) -> Properties {
        let mut properties = Properties::new();
        properties.insert(ENABLED_PROPERTY.to_string(), self.enabled.to_string());
        properties
    }
}

/// Reads an on/off flag with the same false values the cache factory uses;
/// anything else switches it on.
fn parse_enabled(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) if v.trim().is_empty() => default,
        Some(v) => !is_false_flag(&v),
        None => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            default_ttl: None,
            backend: Backend::Redis,
            purge_interval: 1,
            enabled: true,
        }
    }
}
