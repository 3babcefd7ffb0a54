//! Cache Configuration

use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default period between sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How often the sweeper purges expired entries. Bounds the memory held
    /// by expired-but-unswept entries.
    pub sweep_interval: Duration,

    /// Number of entries the map is pre-sized for
    pub initial_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            initial_capacity: 0,
        }
    }
}

impl CacheConfig {
    /// Set the sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Set the initial map capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Reject values that would make the sweeper spin
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidSweepInterval);
        }
        Ok(())
    }
}
