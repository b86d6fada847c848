//! Shutdown coordination for background tasks
//!
//! The HTTP server stops on its own when it receives SIGINT/SIGTERM. Background
//! tasks such as the expiration sweeper register with the coordinator, wait on
//! their [`ShutdownHandle`], and acknowledge once they have stopped. After the
//! server returns, `main` calls [`ShutdownCoordinator::shutdown`] which
//! broadcasts the stop signal and waits for every acknowledgement, bounded by
//! [`ShutdownConfig::wait_timeout`].
//!
//! # Example
//!
//! ```no_run
//! use notification_service::shutdown::{ShutdownConfig, ShutdownCoordinator};
//!
//! # async fn example() {
//! let coordinator = ShutdownCoordinator::new(ShutdownConfig::default());
//! let mut handle = coordinator.register_task("worker");
//!
//! tokio::spawn(async move {
//!     handle.wait_for_shutdown().await;
//!     handle.notify_complete();
//! });
//!
//! coordinator.shutdown().await;
//! # }
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

/// Default time to wait for registered tasks (10 seconds)
const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Poll interval while waiting for acknowledgements
const POLL_INTERVAL_MS: u64 = 20;

#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// How long to wait for registered tasks to acknowledge shutdown
    pub wait_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
        }
    }
}

impl ShutdownConfig {
    /// Create a configuration with the given wait timeout
    pub fn with_timeout(wait_timeout: Duration) -> Self {
        Self { wait_timeout }
    }
}

#[derive(Debug, Default)]
struct ShutdownState {
    registered_tasks: usize,
    completed_tasks: usize,
}

/// Outcome of a coordinated shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every registered task acknowledged
    Graceful,
    /// The wait timeout elapsed with tasks still running
    TimedOut { remaining_tasks: usize },
}

pub struct ShutdownCoordinator {
    config: ShutdownConfig,
    state: Arc<Mutex<ShutdownState>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    /// Create a coordinator with no registered tasks
    pub fn new(config: ShutdownConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            config,
            state: Arc::new(Mutex::new(ShutdownState::default())),
            shutdown_tx,
        }
    }

    /// Register a task that must acknowledge shutdown
    pub fn register_task(&self, task_name: &str) -> ShutdownHandle {
        let mut state = self.state.lock();
        state.registered_tasks += 1;

        info!(
            task_name = %task_name,
            total_tasks = state.registered_tasks,
            "Task registered for shutdown coordination"
        );

        ShutdownHandle {
            task_name: task_name.to_string(),
            shutdown_rx: self.shutdown_tx.subscribe(),
            state: Arc::clone(&self.state),
            completed: false,
        }
    }

    /// Broadcast the stop signal and wait for registered tasks
    pub async fn shutdown(self) -> ShutdownOutcome {
        let registered = self.state.lock().registered_tasks;

        info!(
            registered_tasks = registered,
            timeout_ms = self.config.wait_timeout.as_millis() as u64,
            "Broadcasting shutdown signal"
        );

        // No receivers is fine: every handle may already have been dropped.
        let _ = self.shutdown_tx.send(());

        let start = Instant::now();
        // An unrepresentable deadline means waiting until every task acknowledges.
        let deadline = start.checked_add(self.config.wait_timeout);

        loop {
            let completed = self.state.lock().completed_tasks;

            if completed >= registered {
                info!(
                    completed_tasks = completed,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "All tasks stopped"
                );
                return ShutdownOutcome::Graceful;
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                let remaining = registered - completed;
                warn!(
                    completed_tasks = completed,
                    remaining_tasks = remaining,
                    "Shutdown wait timeout exceeded"
                );
                return ShutdownOutcome::TimedOut {
                    remaining_tasks: remaining,
                };
            }

            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(ShutdownConfig::default())
    }
}

/// Handle held by a registered task
pub struct ShutdownHandle {
    task_name: String,
    shutdown_rx: broadcast::Receiver<()>,
    state: Arc<Mutex<ShutdownState>>,
    completed: bool,
}

impl ShutdownHandle {
    /// Name the task registered with
    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// Resolves once shutdown is broadcast or the coordinator is dropped
    pub async fn wait_for_shutdown(&mut self) {
        let _ = self.shutdown_rx.recv().await;
        info!(task_name = %self.task_name, "Shutdown signal received");
    }

    /// Acknowledge that the task has stopped; repeated calls count once
    pub fn notify_complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;

        let mut state = self.state.lock();
        state.completed_tasks += 1;

        info!(
            task_name = %self.task_name,
            completed_tasks = state.completed_tasks,
            registered_tasks = state.registered_tasks,
            "Task completed shutdown"
        );
    }
}
