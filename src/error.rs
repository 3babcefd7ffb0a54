//! Error Types
//!
//! Caller programming errors and lifecycle misuse. A missing or expired key
//! is never an error; lookups report it as `None`.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using `CacheError`
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors returned by the store, the sweeper and the cache facade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A TTL of zero was passed to `set`
    #[error("invalid ttl: must be greater than zero")]
    InvalidTtl,

    /// `now + ttl` cannot be represented by the clock
    #[error("ttl of {0:?} overflows the clock")]
    TtlOverflow(Duration),

    /// A sweep interval of zero was configured
    #[error("invalid sweep interval: must be greater than zero")]
    InvalidSweepInterval,

    /// `start` was called on a sweeper that is already running
    #[error("sweeper is already running")]
    AlreadyRunning,

    /// `start` was called on a sweeper that has been stopped
    #[error("sweeper has been stopped and cannot be restarted")]
    SweeperStopped,

    /// `start` was called outside of a Tokio runtime
    #[error("no Tokio runtime available to spawn the sweeper")]
    NoRuntime,
}
