//! Redis Query Cache - command-line probe
//!
//! Opens one named cache and applies commands read from stdin, one per line:
//!
//! ```text
//! put <key> <json>
//! get <key>
//! remove <key>
//! size
//! clear
//! ```

use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_query_cache::config::Backend;
use redis_query_cache::{
    spawn_purge_task, CacheFactory, Config, ConnectionProvider, HashCache, JsonCodec, MemoryStore,
    RedisProvider,
};

/// Main entry point for the cache probe.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the configured backend and build the cache factory
/// 4. Create the cache named on the command line
/// 5. Apply commands from stdin until EOF
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_query_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let name = std::env::args()
        .nth(1)
        .context("usage: redis_query_cache <cache-name>")?;

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, default_ttl={:?}, enabled={}",
        config.backend, config.default_ttl, config.enabled
    );

    match config.backend {
        Backend::Redis => {
            let provider = RedisProvider::connect(&config.redis_url)
                .await
                .with_context(|| format!("connecting to {}", config.redis_url))?;
            run(Arc::new(provider), &name, &config).await
        }
        Backend::Memory => {
            let store = MemoryStore::new();
            let purge_handle = spawn_purge_task(store.clone(), config.purge_interval);
            let result = run(Arc::new(store), &name, &config).await;
            purge_handle.abort();
            warn!("Purge task aborted");
            result
        }
    }
}

async fn run<P>(provider: Arc<P>, name: &str, config: &Config) -> anyhow::Result<()>
where
    P: ConnectionProvider,
{
    let factory = CacheFactory::builder()
        .provider(provider)
        .codec(Arc::new(JsonCodec::new()))
        .default_ttl(config.default_ttl)
        .build()?;
    let cache = factory.create_cache(name, None, &config.properties())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match execute(&cache, line).await {
            Ok(output) => println!("{}", output),
            Err(err) => eprintln!("error: {:#}", err),
        }
    }

    info!("Probe finished for cache [{}]", name);
    Ok(())
}

async fn execute<P>(cache: &HashCache<P, JsonCodec>, line: &str) -> anyhow::Result<String>
where
    P: ConnectionProvider,
{
    let mut parts = line.splitn(3, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let key = parts.next();
    let rest = parts.next();

    match (command, key) {
        ("size", None) => Ok(cache.size().await?.to_string()),
        ("clear", None) => {
            cache.clear().await?;
            Ok("OK".to_string())
        }
        ("get", Some(key)) => match cache.get::<_, Value>(key).await? {
            Some(value) => Ok(value.to_string()),
            None => Ok("(nil)".to_string()),
        },
        ("remove", Some(key)) => Ok(cache.remove(key).await?.to_string()),
        ("put", Some(key)) => {
            let raw = rest.context("put needs a JSON value")?;
            let value: Value = serde_json::from_str(raw)
                .with_context(|| format!("invalid JSON value: {}", raw))?;
            cache.put(key, &value).await?;
            Ok("OK".to_string())
        }
        _ => bail!("unknown command: {}", line),
    }
}
