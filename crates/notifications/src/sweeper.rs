//! Background task that periodically removes expired notifications

use crate::shutdown::ShutdownHandle;
use crate::store::NotificationStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 20;

/// Longest sweep period (one day); longer intervals are clamped
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 24 * 3600;

pub struct ExpirationSweeper {
    store: Arc<NotificationStore>,
    interval: Duration,
}

impl ExpirationSweeper {
    /// Create a sweeper over `store`, clamping `interval` to one day
    pub fn new(store: Arc<NotificationStore>, interval: Duration) -> Self {
        let interval = interval.min(Duration::from_secs(MAX_SWEEP_INTERVAL_SECS));
        Self { store, interval }
    }

    /// Create a sweeper running every 20 seconds
    pub fn with_default_interval(store: Arc<NotificationStore>) -> Self {
        Self::new(store, Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS))
    }

    /// Effective sweep period
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single sweep against the current time
    pub fn sweep_once(&self) -> usize {
        let removed = self.store.sweep_expired();

        if removed > 0 {
            info!(
                removed,
                remaining = self.store.len(),
                "Removed expired notifications"
            );
        } else {
            debug!("Sweep found no expired notifications");
        }

        removed
    }

    /// Sweep every interval until shutdown is signaled
    ///
    /// The first sweep runs one full interval after start.
    pub async fn run(self, mut shutdown: ShutdownHandle) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.interval.as_secs_f64(),
            "Starting expiration sweeper"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                _ = shutdown.wait_for_shutdown() => {
                    info!("Stopping expiration sweeper");
                    break;
                }
            }
        }

        shutdown.notify_complete();
    }

    /// Spawn [`ExpirationSweeper::run`] on the tokio runtime
    pub fn spawn(self, shutdown: ShutdownHandle) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
