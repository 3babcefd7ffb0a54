//! Cache Metrics
//!
//! Lookup, write and eviction counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector shared by a store and its sweeper
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Lookups that returned a live value
    hits: AtomicU64,

    /// Lookups on keys that were never set or already swept
    misses: AtomicU64,

    /// Lookups that found an entry past its deadline
    expired_reads: AtomicU64,

    sets: AtomicU64,
    deletes: AtomicU64,

    /// Completed sweep scans, including ones that removed nothing
    sweeps: AtomicU64,

    /// Entries physically removed by sweeps
    evicted: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub expired_reads: u64,
    pub sets: u64,
    pub deletes: u64,
    pub sweeps: u64,
    pub evicted: u64,
}

impl CacheMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_expired_read(&self) {
        self.expired_reads.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sweep(&self, removed: usize) {
        self.evicted.fetch_add(removed as u64, Ordering::Relaxed);
        // Published last so a reader that sees the sweep also sees its evictions
        self.sweeps.fetch_add(1, Ordering::Release);
    }

    /// Get hit count
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get miss count, expired reads included
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed) + self.expired_reads.load(Ordering::Relaxed)
    }

    /// Get number of completed sweeps
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Acquire)
    }

    /// Get number of entries removed by sweeps
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    /// Fraction of lookups that hit, 0.0 when nothing was looked up
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    /// Copy every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_reads: self.expired_reads.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Acquire),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }

    /// Get a summary of metrics
    pub fn summary(&self) -> String {
        let s = self.snapshot();
        format!(
            "Lookups: hits={}, misses={}, expired={} (ratio {:.2}) | Writes: sets={}, deletes={} | Sweeps: {} evicted={}",
            s.hits,
            s.misses,
            s.expired_reads,
            self.hit_ratio(),
            s.sets,
            s.deletes,
            s.sweeps,
            s.evicted
        )
    }
}
