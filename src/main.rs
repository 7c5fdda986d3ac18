//! TTL Cache demo binary
//!
//! Wires configuration, logging, a local cache and its cleanup task together,
//! then walks through a set / replace / delete cycle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{spawn_cleanup_task, Cache, Config, Context, LocalCache};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with configured parameters
/// 4. Start background TTL cleanup task, unless disabled
/// 5. Run the demo scenario and print statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: cleanup_interval={}ms, initial_capacity={}",
        config.cleanup_interval_ms, config.initial_capacity
    );

    let cache = Arc::new(LocalCache::<String>::from_config(&config));

    let cleanup_handle = config
        .cleanup_interval()
        .map(|interval| spawn_cleanup_task(Arc::clone(&cache), interval));
    if cleanup_handle.is_none() {
        info!("Cleanup task disabled, relying on lazy expiry");
    }

    run_scenario(cache.as_ref()).await?;

    let stats = cache.stats().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("serializing cache stats")?
    );

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }

    Ok(())
}

/// Set, replace, expire and delete a couple of keys through the contract.
async fn run_scenario(cache: &dyn Cache<String>) -> anyhow::Result<()> {
    let ctx = Context::background().with_timeout(Duration::from_secs(5));
    let hour = Duration::from_secs(3600);

    cache.set(&ctx, "a", "1".to_string(), hour).await?;
    let value = cache.get(&ctx, "a").await?;
    info!(%value, "get a after first set");

    cache.set(&ctx, "a", "2".to_string(), hour).await?;
    let value = cache.get(&ctx, "a").await?;
    info!(%value, "get a after replace");

    cache.del(&ctx, "a").await?;
    report_miss(cache, &ctx, "a").await?;

    cache
        .set(&ctx, "short", "gone soon".to_string(), Duration::from_millis(50))
        .await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    report_miss(cache, &ctx, "short").await?;

    Ok(())
}

async fn report_miss(cache: &dyn Cache<String>, ctx: &Context, key: &str) -> anyhow::Result<()> {
    match cache.get(ctx, key).await {
        Ok(value) => anyhow::bail!("expected {key} to be absent, found {value}"),
        Err(err) if err.is_key_not_found() => {
            info!(key, "miss: {}", err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
