/// Actix-web HTTP facade for the notification store
///
/// Endpoints:
/// - GET /health - Health check
/// - GET /notifications - List live notifications
/// - POST /notification - Create a notification
/// - POST /notifications - Create a notification (alias)
use crate::error::NotificationError;
use crate::notification::NewNotification;
use crate::store::NotificationStore;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};

/// Largest accepted request body
const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// State shared across handlers
pub struct AppState {
    pub store: Arc<NotificationStore>,
}

impl AppState {
    /// Wrap a shared store for the handlers
    pub fn new(store: Arc<NotificationStore>) -> Self {
        Self { store }
    }
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "notification-service",
        "version": env!("CARGO_PKG_VERSION"),
        "notifications": state.store.len()
    }))
}

async fn list_notifications(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.list())
}

async fn create_notification(
    state: web::Data<AppState>,
    request: web::Json<NewNotification>,
) -> Result<HttpResponse, NotificationError> {
    let notification = state.store.insert(request.into_inner()).map_err(|e| {
        warn!(error = %e, "Rejected notification");
        e
    })?;

    info!(
        id = %notification.id,
        tag = %notification.tag,
        exp = %notification.expiration,
        "Created notification"
    );

    Ok(HttpResponse::Created().json(notification))
}

/// Malformed bodies are rejected before the store is reached
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!(error = %err, "Rejected malformed notification payload");

    let response = HttpResponse::BadRequest().json(serde_json::json!({
        "error": err.to_string()
    }));
    InternalError::from_response(err, response).into()
}

/// Register routes and extractor config; state is provided by the caller
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_PAYLOAD_BYTES)
            .error_handler(json_error_handler),
    )
    .route("/health", web::get().to(health_check))
    .route("/notifications", web::get().to(list_notifications))
    .route("/notifications", web::post().to(create_notification))
    .route("/notification", web::post().to(create_notification));
}

/// Bind and run the HTTP server until it is stopped by a signal
pub async fn start_server(host: &str, port: u16, store: Arc<NotificationStore>) -> std::io::Result<()> {
    info!("Starting notification service on {}:{}", host, port);

    let state = web::Data::new(AppState::new(store));

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run()
    .await
}
