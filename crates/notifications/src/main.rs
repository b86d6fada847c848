//! Notification Service - Expiring in-memory notifications
//!
//! Port: 8080 (NOTIFICATION_SERVICE_PORT)

use notification_service::{
    init_tracing, load_dotenv, start_server, ExpirationSweeper, NotificationStore, ServiceConfig,
    ShutdownConfig, ShutdownCoordinator,
};
use std::io;
use std::sync::Arc;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_dotenv();
    init_tracing();

    let config = ServiceConfig::from_env()
        .and_then(|config| config.validate().map(|_| config))
        .map_err(|e| {
            error!(key = %e.key(), "Invalid configuration: {}", e);
            io::Error::new(io::ErrorKind::InvalidInput, e)
        })?;

    let default_ttl = config
        .default_ttl_chrono()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    info!(
        host = %config.host,
        port = config.port,
        sweep_interval_secs = config.sweep_interval.as_secs(),
        default_ttl_secs = config.default_ttl.as_secs(),
        "Starting notification service"
    );

    let store = Arc::new(NotificationStore::with_default_ttl(default_ttl));

    let coordinator = ShutdownCoordinator::new(ShutdownConfig::with_timeout(
        config.shutdown_timeout,
    ));
    let sweeper = ExpirationSweeper::new(Arc::clone(&store), config.sweep_interval)
        .spawn(coordinator.register_task("expiration-sweeper"));

    let result = start_server(&config.host, config.port, store).await;

    coordinator.shutdown().await;
    if let Err(e) = sweeper.await {
        error!("Expiration sweeper task failed: {}", e);
    }

    info!("Notification service stopped");
    result
}
