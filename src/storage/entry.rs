//! Store Entry

use std::time::{Duration, Instant};

/// Value with its absolute deadline
///
/// Never mutated after construction; refreshing a TTL replaces the entry.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    pub(crate) fn new(value: V, expires_at: Instant) -> Self {
        Self { value, expires_at }
    }

    /// Live while `now < expires_at`
    #[inline]
    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
