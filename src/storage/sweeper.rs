//! Expiry Sweeper
//!
//! Background task that periodically removes expired keys.
//!
//! Lifecycle is explicit: `new` builds an idle sweeper, `start` spawns the
//! loop on the current Tokio runtime, `stop` flips a watch flag the loop
//! selects on. Stopping is idempotent, never blocks, and is valid before
//! `start`. A stopped sweeper cannot be restarted.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::Store;
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};

/// Sweeper lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweeperState {
    /// Constructed, loop not spawned
    Idle,
    /// Loop spawned and sweeping every interval
    Running,
    /// Stop requested; terminal
    Stopped,
}

impl std::fmt::Display for SweeperState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweeperState::Idle => write!(f, "idle"),
            SweeperState::Running => write!(f, "running"),
            SweeperState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Background expiry sweeper for a `Store`
pub struct Sweeper<V, C = SystemClock> {
    store: Store<V, C>,
    interval: Duration,
    state: Mutex<SweeperState>,
    stop_tx: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl<V, C> Sweeper<V, C>
where
    V: Send + Sync + 'static,
    C: Clock,
{
    /// Create an idle sweeper for `store`
    pub fn new(store: Store<V, C>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(CacheError::InvalidSweepInterval);
        }
        let (stop_tx, _) = watch::channel(false);
        Ok(Self {
            store,
            interval,
            state: Mutex::new(SweeperState::Idle),
            stop_tx,
            handle: Mutex::new(None),
        })
    }

    /// Spawn the sweep loop on the current Tokio runtime
    ///
    /// The first sweep runs one interval after this call.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            SweeperState::Running => return Err(CacheError::AlreadyRunning),
            SweeperState::Stopped => return Err(CacheError::SweeperStopped),
            SweeperState::Idle => {}
        }
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let stop_rx = self.stop_tx.subscribe();
        let task = runtime.spawn(run(self.store.clone(), self.interval, stop_rx));
        *self.handle.lock() = Some(task);
        *state = SweeperState::Running;

        info!("Sweeper started, interval: {:?}", self.interval);
        Ok(())
    }

    /// Request the loop to exit
    ///
    /// Returns immediately. A sweep already in progress on another worker
    /// thread finishes; none starts afterwards. Use `shutdown` to also wait
    /// for the task.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == SweeperState::Stopped {
            return;
        }
        let previous = *state;
        *state = SweeperState::Stopped;
        self.stop_tx.send_replace(true);

        info!(from = %previous, "Sweeper stopped");
    }

    /// Stop and wait for the background task to finish
    pub async fn shutdown(&self) {
        self.stop();
        let task = self.handle.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Sweeper task ended abnormally");
            }
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SweeperState {
        *self.state.lock()
    }

    /// Period between sweeps
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Store this sweeper cleans
    pub fn store(&self) -> &Store<V, C> {
        &self.store
    }
}

impl<V, C> Drop for Sweeper<V, C> {
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
    }
}

async fn run<V, C>(store: Store<V, C>, period: Duration, mut stop_rx: watch::Receiver<bool>)
where
    V: Send + Sync + 'static,
    C: Clock,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !*stop_rx.borrow() {
        tokio::select! {
            biased;
            // Fires on the stop flag or when every sender is gone
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {
                let removed = store.sweep();
                if removed > 0 {
                    debug!(removed = removed, "Cleaned up expired keys");
                }
            }
        }
    }

    debug!("Sweeper loop exited");
}
