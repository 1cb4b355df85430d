//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired cache entries, bounding
//! both memory held by entries nobody reads again and the window in which
//! `list_keys` reports expired keys.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::cache::CacheService;

// == Sweeper Handle ==
/// Owner of a running sweeper.
///
/// Dropping the handle closes the shutdown channel, which stops the sweeper
/// as soon as its loop next polls, without waiting for a tick.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!("Expiry sweeper ended abnormally: {}", e);
        }
    }

    /// Returns true once the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Shortest period the sweeper will run at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// An interval below [`MIN_SWEEP_INTERVAL`] is raised to it.
/// Each pass removes at most `batch_size` keys per write-lock acquisition.
/// A pass that fails, even by panicking, is logged and the next tick runs as
/// usual.
///
/// # Example
/// ```ignore
/// let cache = CacheService::new(600);
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(120), 64);
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweeper(
    cache: CacheService,
    interval: Duration,
    batch_size: usize,
) -> SweeperHandle {
    let interval = if interval < MIN_SWEEP_INTERVAL {
        warn!(
            "Sweep interval {:?} is too short, using {:?}",
            interval, MIN_SWEEP_INTERVAL
        );
        MIN_SWEEP_INTERVAL
    } else {
        interval
    };
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {:?}, batch size {}",
            interval, batch_size
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Expiry sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    run_sweep(&cache, batch_size).await;
                }
            }
        }
    });

    SweeperHandle {
        shutdown: Some(shutdown_tx),
        task,
    }
}

/// Runs one sweep pass on its own task so a panic cannot take the loop down.
async fn run_sweep(cache: &CacheService, batch_size: usize) {
    let cache = cache.clone();
    let pass = tokio::spawn(async move { cache.sweep_expired(batch_size).await });

    match pass.await {
        Ok(0) => debug!("Expiry sweep: no expired entries found"),
        Ok(removed) => info!("Expiry sweep: removed {} expired entries", removed),
        Err(e) => error!("Expiry sweep failed: {}", e),
    }
}
