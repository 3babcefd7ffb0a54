//! Storage Engine
//!
//! In-memory key-value store with TTL support and its background sweeper.

mod entry;
mod store;
mod sweeper;

pub use store::Store;
pub use sweeper::{Sweeper, SweeperState};
