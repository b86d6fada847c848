//! Error types for the notification service

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Errors returned by notification store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Validation error: {field} must not be empty")]
    Validation { field: &'static str },
}

impl NotificationError {
    /// Validation failure for an empty required field
    pub fn validation(field: &'static str) -> Self {
        NotificationError::Validation { field }
    }
}

impl ResponseError for NotificationError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotificationError::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            NotificationError::Validation { field } => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": self.to_string(),
                    "field": field
                }))
            }
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse {key}: {message}")]
    Parse { key: String, message: String },

    #[error("Invalid configuration for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    /// Environment variable the error refers to
    pub fn key(&self) -> &str {
        match self {
            ConfigError::Parse { key, .. } | ConfigError::Invalid { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_validation_message_names_field() {
        let err = NotificationError::validation("title");
        assert_eq!(err.to_string(), "Validation error: title must not be empty");
    }

    #[actix_web::test]
    async fn test_validation_error_response() {
        let err = NotificationError::validation("tag");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["field"], "tag");
        assert!(json["error"].as_str().unwrap().contains("tag"));
    }

    #[test]
    fn test_config_error_key() {
        let err = ConfigError::Invalid {
            key: "NOTIFICATION_SERVICE_PORT".to_string(),
            message: "port must be greater than 0".to_string(),
        };
        assert_eq!(err.key(), "NOTIFICATION_SERVICE_PORT");
    }
}
