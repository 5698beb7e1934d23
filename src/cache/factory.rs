//! Cache Factory
//!
//! Creates one [`HashCache`] per logical cache name, injecting the shared
//! connection provider and codec.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::HashCache;
use crate::codec::Codec;
use crate::error::{CacheError, Result};
use crate::store::ConnectionProvider;

/// Property bag handed to the factory by the ORM configuration.
pub type Properties = HashMap<String, String>;

/// Property switching the factory off when set to a false value.
pub const ENABLED_PROPERTY: &str = "cache.enabled";

/// Returns true for the values that switch a flag off: `false`, `0`, `no`,
/// `off`, in any case.
pub fn is_false_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

// == Factory Builder ==
/// Collects the factory's dependencies; `build` fails on a missing one.
pub struct CacheFactoryBuilder<P, C> {
    provider: Option<Arc<P>>,
    codec: Option<Arc<C>>,
    default_ttl: Option<u64>,
}

impl<P, C> Default for CacheFactoryBuilder<P, C> {
    fn default() -> Self {
        Self {
            provider: None,
            codec: None,
            default_ttl: None,
        }
    }
}

impl<P, C> CacheFactoryBuilder<P, C>
where
    P: ConnectionProvider,
    C: Codec,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(mut self, provider: Arc<P>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn codec(mut self, codec: Arc<C>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// TTL used when `create_cache` is called without one.
    pub fn default_ttl(mut self, ttl: Option<u64>) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<CacheFactory<P, C>> {
        let provider = self.provider.ok_or_else(|| {
            CacheError::Validation("Connection provider must not be null.".to_string())
        })?;
        let codec = self
            .codec
            .ok_or_else(|| CacheError::Validation("Codec must not be null.".to_string()))?;

        Ok(CacheFactory {
            provider,
            codec,
            default_ttl: self.default_ttl,
        })
    }
}

// == Cache Factory ==
pub struct CacheFactory<P, C> {
    provider: Arc<P>,
    codec: Arc<C>,
    default_ttl: Option<u64>,
}

impl<P, C> CacheFactory<P, C>
where
    P: ConnectionProvider,
    C: Codec,
{
    pub fn builder() -> CacheFactoryBuilder<P, C> {
        CacheFactoryBuilder::new()
    }

    pub fn default_ttl(&self) -> Option<u64> {
        self.default_ttl
    }

    // == Is Active ==
    /// A factory is active unless `cache.enabled` holds a false value
    /// (`false`, `0`, `no`, `off`, any case).
    pub fn is_active(properties: &Properties) -> bool {
        !properties
            .get(ENABLED_PROPERTY)
            .is_some_and(|value| is_false_flag(value))
    }

    // == Create Cache ==
    /// Creates the adapter for cache `id`.
    ///
    /// `ttl` falls back to the factory default when absent. No remote call is
    /// made here.
    pub fn create_cache(
        &self,
        id: &str,
        ttl: Option<u64>,
        properties: &Properties,
    ) -> Result<HashCache<P, C>> {
        if !Self::is_active(properties) {
            return Err(CacheError::Disabled(format!(
                "cache [{}] requested while {} is off",
                id, ENABLED_PROPERTY
            )));
        }

        let ttl = ttl.or(self.default_ttl);
        let cache = HashCache::new(id, self.provider.clone(), ttl, self.codec.clone())?;
        info!("Created cache [{}] with TTL {:?}", id, ttl);
        Ok(cache)
    }
}
