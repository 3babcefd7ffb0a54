//! TTLKV - Expiring In-Memory Key-Value Cache
//!
//! A thread-safe store whose entries expire after a per-entry TTL, with
//! lazy expiration on reads and a background sweeper that reclaims expired
//! entries on a fixed interval.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;

pub use cache::Cache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_SWEEP_INTERVAL};
pub use error::{CacheError, Result};
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use storage::{Store, Sweeper, SweeperState};
