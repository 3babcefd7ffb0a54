//! Expiring Cache
//!
//! A store paired with its sweeper, built from one `CacheConfig`.

use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::metrics::CacheMetrics;
use crate::storage::{Store, Sweeper, SweeperState};

/// Store plus background sweeper
///
/// Construction does not spawn anything; call `start` from inside a Tokio
/// runtime to begin sweeping and `stop` or `shutdown` to end it. The store
/// keeps serving reads and writes in every sweeper state.
pub struct Cache<V, C = SystemClock> {
    store: Store<V, C>,
    sweeper: Sweeper<V, C>,
    config: CacheConfig,
}

impl<V> Cache<V, SystemClock>
where
    V: Send + Sync + 'static,
{
    /// Create a cache on the system clock
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<V, C> Cache<V, C>
where
    V: Send + Sync + 'static,
    C: Clock,
{
    /// Create a cache reading time from `clock`
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        config.validate()?;
        let store = Store::with_clock_and_capacity(clock, config.initial_capacity);
        let sweeper = Sweeper::new(store.clone(), config.sweep_interval)?;
        Ok(Self {
            store,
            sweeper,
            config,
        })
    }

    /// Start the background sweeper
    pub fn start(&self) -> Result<()> {
        self.sweeper.start()
    }

    /// Signal the sweeper to stop without waiting
    pub fn stop(&self) {
        self.sweeper.stop()
    }

    /// Stop the sweeper and wait for its task
    pub async fn shutdown(&self) {
        self.sweeper.shutdown().await
    }

    pub fn sweeper_state(&self) -> SweeperState {
        self.sweeper.state()
    }

    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        self.store.set(key, value, ttl)
    }

    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.store.get(key)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.store.delete(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Number of stored entries, expired-but-unswept included
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Handle to the underlying store
    pub fn store(&self) -> &Store<V, C> {
        &self.store
    }

    pub fn metrics(&self) -> &CacheMetrics {
        self.store.metrics()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
