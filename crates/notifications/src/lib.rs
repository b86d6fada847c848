//! Notification Service
//!
//! In-memory notification store with time-based expiry, served over HTTP.
//!
//! Features:
//! - Insertion-ordered store guarded by a read/write lock
//! - Server-assigned ids and default expiration (10 minutes)
//! - Background sweeper removing expired notifications on a fixed interval
//! - Coordinated shutdown of the sweeper after the HTTP server stops
pub mod config;
pub mod error;
pub mod notification;
pub mod server;
pub mod shutdown;
pub mod store;
pub mod sweeper;

pub use config::{load_dotenv, ServiceConfig};
pub use error::{ConfigError, NotificationError};
pub use notification::{NewNotification, Notification};
pub use server::{configure, start_server, AppState};
pub use shutdown::{ShutdownConfig, ShutdownCoordinator, ShutdownHandle, ShutdownOutcome};
pub use store::NotificationStore;
pub use sweeper::ExpirationSweeper;

/// Initialize tracing for the notification service
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notification_service=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
