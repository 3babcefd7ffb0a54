//! TTLKV Demo Binary
//!
//! Runs the user:1 / user:2 / user:3 expiry walkthrough against the system
//! clock and a live sweeper.

use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use ttlkv::{Cache, CacheConfig};

/// TTLKV Demo - expiring cache walkthrough
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Sweep interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    sweep_interval_ms: u64,

    /// Divide every TTL and wait by this factor
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    time_scale: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ttlkv=info".parse()?))
        .init();

    let args = Args::parse();
    let scale = |d: Duration| d / args.time_scale;

    let config = CacheConfig::default()
        .with_sweep_interval(scale(Duration::from_millis(args.sweep_interval_ms)));
    let cache: Cache<String> = Cache::new(config)?;
    cache.start()?;

    cache.set("user:1", "Alice".to_string(), scale(Duration::from_secs(2)))?;
    cache.set("user:2", "Bob".to_string(), scale(Duration::from_secs(4)))?;
    cache.set("user:3", "Charlie".to_string(), scale(Duration::from_secs(1)))?;

    report(&cache, "user:1");

    tokio::time::sleep(scale(Duration::from_millis(1500))).await;
    report(&cache, "user:3");
    report(&cache, "user:1");

    tokio::time::sleep(scale(Duration::from_secs(2))).await;
    info!(entries = cache.len(), keys = ?cache.store().keys(), "After sweep");

    cache.shutdown().await;
    info!("{}", cache.metrics().summary());

    Ok(())
}

fn report(cache: &Cache<String>, key: &str) {
    match cache.get(key) {
        Some(value) => info!(key = key, value = %value, "Found"),
        None => info!(key = key, "Missing or expired"),
    }
}
