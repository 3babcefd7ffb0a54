//! In-Memory Key-Value Store
//!
//! Hashmap behind a single reader/writer lock, with per-entry deadlines.
//! Reads treat expired entries as absent but leave them in place; only
//! `sweep` (and explicit deletes) physically remove them.

use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use super::entry::Entry;
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::metrics::CacheMetrics;

struct StoreInner<V, C> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    clock: C,
    metrics: CacheMetrics,
}

/// Thread-safe in-memory key-value store with TTL
///
/// Cloning is cheap and yields a handle to the same map.
pub struct Store<V, C = SystemClock> {
    inner: Arc<StoreInner<V, C>>,
}

impl<V, C> Clone for Store<V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for Store<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Store<V, SystemClock> {
    /// Create a new empty store on the system clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create a store pre-sized for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_clock_and_capacity(SystemClock, capacity)
    }
}

impl<V, C: Clock> Store<V, C> {
    /// Create a new empty store reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self::with_clock_and_capacity(clock, 0)
    }

    pub fn with_clock_and_capacity(clock: C, capacity: usize) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                entries: RwLock::new(HashMap::with_capacity(capacity)),
                clock,
                metrics: CacheMetrics::new(),
            }),
        }
    }

    /// Insert or replace `key`, live for `ttl` from now
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl);
        }
        let expires_at = self
            .inner
            .clock
            .now()
            .checked_add(ttl)
            .ok_or(CacheError::TtlOverflow(ttl))?;

        let entry = Entry::new(value, expires_at);
        let mut map = self.inner.entries.write();
        map.insert(key.into(), entry);
        drop(map);

        self.inner.metrics.record_set();
        Ok(())
    }

    /// Get value by key, returns None if key doesn't exist or is expired
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let map = self.inner.entries.read();
        let now = self.inner.clock.now();
        match map.get(key) {
            None => {
                self.inner.metrics.record_miss();
                None
            }
            Some(entry) if entry.is_expired(now) => {
                self.inner.metrics.record_expired_read();
                None
            }
            Some(entry) => {
                self.inner.metrics.record_hit();
                Some(entry.value().clone())
            }
        }
    }

    /// Delete key, returns true if an entry (live or expired) was removed
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.inner.entries.write().remove(key).is_some();
        if removed {
            self.inner.metrics.record_delete();
        }
        removed
    }

    /// Check if key exists and is not expired
    pub fn contains_key(&self, key: &str) -> bool {
        let map = self.inner.entries.read();
        let now = self.inner.clock.now();
        map.get(key).is_some_and(|e| !e.is_expired(now))
    }

    /// Time left before `key` expires, None if absent or expired
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let map = self.inner.entries.read();
        let now = self.inner.clock.now();
        map.get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.remaining(now))
    }

    /// Remove every entry whose deadline has passed, returns count removed
    ///
    /// Holds the write lock for the whole scan and judges every entry
    /// against one instant read after the lock is taken.
    pub fn sweep(&self) -> usize {
        let mut map = self.inner.entries.write();
        let now = self.inner.clock.now();
        let before = map.len();
        map.retain(|key, entry| {
            if entry.is_expired(now) {
                trace!(key = %key, "Evicting expired entry");
                false
            } else {
                true
            }
        });
        let removed = before - map.len();
        drop(map);

        self.inner.metrics.record_sweep(removed);
        removed
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.inner.entries.write().clear();
    }

    /// Get the number of stored entries (including expired)
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Get the number of entries a `get` would return right now
    pub fn live_len(&self) -> usize {
        let map = self.inner.entries.read();
        let now = self.inner.clock.now();
        map.values().filter(|e| !e.is_expired(now)).count()
    }

    /// Check if store is empty (expired entries count as present)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all live keys (for debugging/testing)
    pub fn keys(&self) -> Vec<String> {
        let map = self.inner.entries.read();
        let now = self.inner.clock.now();
        map.iter()
            .filter(|(_, e)| !e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Counters for this store
    pub fn metrics(&self) -> &CacheMetrics {
        &self.inner.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::mpsc;
    use std::thread;

    fn store() -> (Store<String, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Store::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_basic_operations() {
        let (store, _) = store();

        // Set and get
        store.set("key", "value".to_string(), Duration::from_secs(10)).unwrap();
        assert_eq!(store.get("key"), Some("value".to_string()));

        // Exists
        assert!(store.contains_key("key"));

        // Delete
        assert!(store.delete("key"));
        assert!(!store.contains_key("key"));
        assert_eq!(store.get("key"), None);

        // Deleting again is not an error
        assert!(!store.delete("key"));
    }

    #[test]
    fn test_overwrite_replaces_value_and_deadline() {
        let (store, clock) = store();

        store.set("k", "v1".to_string(), Duration::from_secs(1)).unwrap();
        store.set("k", "v2".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(store.get("k"), Some("v2".to_string()));
        assert_eq!(store.len(), 1);

        // The first deadline no longer applies
        clock.advance(Duration::from_secs(2));
        assert_eq!(store.get("k"), Some("v2".to_string()));
    }

    #[test]
    fn test_expired_entry_hidden_but_kept() {
        let (store, clock) = store();

        store.set("k", "v".to_string(), Duration::from_millis(1)).unwrap();
        clock.advance(Duration::from_millis(5));

        assert_eq!(store.get("k"), None);
        assert!(!store.contains_key("k"));
        assert_eq!(store.remaining_ttl("k"), None);
        // Reads never remove
        assert_eq!(store.len(), 1);
        assert_eq!(store.live_len(), 0);
        assert_eq!(store.metrics().snapshot().expired_reads, 1);
    }

    #[test]
    fn test_expires_exactly_at_deadline() {
        let (store, clock) = store();

        store.set("k", "v".to_string(), Duration::from_secs(2)).unwrap();
        clock.advance(Duration::from_millis(1999));
        assert!(store.get("k").is_some());

        clock.advance(Duration::from_millis(1));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_zero_ttl_rejected_without_mutation() {
        let (store, _) = store();

        store.set("k", "old".to_string(), Duration::from_secs(10)).unwrap();
        assert_eq!(
            store.set("k", "new".to_string(), Duration::ZERO),
            Err(CacheError::InvalidTtl)
        );
        assert_eq!(store.get("k"), Some("old".to_string()));
        assert_eq!(store.metrics().snapshot().sets, 1);
    }

    #[test]
    fn test_overflowing_ttl_rejected() {
        let (store, _) = store();

        let result = store.set("k", "v".to_string(), Duration::MAX);
        assert_eq!(result, Err(CacheError::TtlOverflow(Duration::MAX)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remaining_ttl() {
        let (store, clock) = store();

        store.set("k", "v".to_string(), Duration::from_secs(10)).unwrap();
        clock.advance(Duration::from_secs(4));
        assert_eq!(store.remaining_ttl("k"), Some(Duration::from_secs(6)));
        assert_eq!(store.remaining_ttl("missing"), None);
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (store, clock) = store();

        for i in 0..10 {
            store
                .set(format!("short{}", i), format!("value{}", i), Duration::from_secs(1))
                .unwrap();
        }
        store.set("long", "stays".to_string(), Duration::from_secs(60)).unwrap();

        clock.advance(Duration::from_secs(2));
        assert_eq!(store.sweep(), 10);
        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["long".to_string()]);

        let snapshot = store.metrics().snapshot();
        assert_eq!(snapshot.sweeps, 1);
        assert_eq!(snapshot.evicted, 10);

        // Nothing left to evict
        assert_eq!(store.sweep(), 0);
    }

    #[test]
    fn test_sweep_is_deterministic_for_fixed_time() {
        let (store, clock) = store();

        store.set("a", "1".to_string(), Duration::from_secs(1)).unwrap();
        store.set("b", "2".to_string(), Duration::from_secs(2)).unwrap();
        store.set("c", "3".to_string(), Duration::from_secs(3)).unwrap();

        clock.advance(Duration::from_secs(2));
        assert_eq!(store.sweep(), 2);
        assert_eq!(store.keys(), vec!["c".to_string()]);
    }

    #[test]
    fn test_clear() {
        let (store, _) = store();
        store.set("a", "1".to_string(), Duration::from_secs(1)).unwrap();
        store.set("b", "2".to_string(), Duration::from_secs(1)).unwrap();

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let (store, _) = store();
        let other = store.clone();

        other.set("k", "v".to_string(), Duration::from_secs(1)).unwrap();
        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_reads_proceed_while_shared_lock_held() {
        let (store, _) = store();
        store.set("k", "v".to_string(), Duration::from_secs(60)).unwrap();

        // Hold a shared guard for the whole test; readers must not queue behind it
        let guard = store.inner.entries.read();

        let (tx, rx) = mpsc::channel();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = store.clone();
                let tx = tx.clone();
                thread::spawn(move || {
                    tx.send(s.get("k")).unwrap();
                })
            })
            .collect();

        for _ in 0..8 {
            let got = rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(got, Some("v".to_string()));
        }

        drop(guard);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_concurrent_access() {
        let store: Store<String> = Store::new();

        // Spawn multiple threads writing concurrently
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let s = store.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        let key = format!("key-{}-{}", i, j);
                        let value = format!("value-{}-{}", i, j);
                        s.set(key.clone(), value.clone(), Duration::from_secs(60))
                            .unwrap();
                        assert_eq!(s.get(&key), Some(value));
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len(), 1000);
        assert_eq!(store.metrics().hits(), 1000);
    }

    #[test]
    fn test_reader_sees_old_or_new_value_only() {
        let store: Store<(u64, u64)> = Store::new();
        store.set("pair", (0, 0), Duration::from_secs(60)).unwrap();

        let writer = {
            let s = store.clone();
            thread::spawn(move || {
                for i in 1..=1000 {
                    s.set("pair", (i, i), Duration::from_secs(60)).unwrap();
                }
            })
        };

        for _ in 0..1000 {
            let (a, b) = store.get("pair").unwrap();
            assert_eq!(a, b);
        }
        writer.join().unwrap();
        assert_eq!(store.get("pair"), Some((1000, 1000)));
    }
}
