//! Time Sources
//!
//! The store never reads the system clock directly; it asks a `Clock`.
//! Production code uses `SystemClock`, tests drive a `ManualClock`.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Supplies the current instant to the store and the sweeper
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Monotonic system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock frozen at `base`
    pub fn starting_at(base: Instant) -> Self {
        Self {
            base,
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move time forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock();
        *offset += by;
    }

    /// Total time advanced since creation
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock()
    }
}
