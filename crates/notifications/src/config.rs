//! Service configuration loaded from environment variables
//!
//! All variables use the `NOTIFICATION_SERVICE_` prefix. A `.env` file is
//! read first when present; real environment variables take precedence.
//!
//! # Environment Variables
//!
//! - `NOTIFICATION_SERVICE_HOST` (optional, fallback `HOST`): bind host (default: "127.0.0.1")
//! - `NOTIFICATION_SERVICE_PORT` (optional, fallback `PORT`): bind port (default: 8080)
//! - `NOTIFICATION_SERVICE_SWEEP_INTERVAL_SECS` (optional): sweeper period (default: 20)
//! - `NOTIFICATION_SERVICE_DEFAULT_TTL_SECS` (optional): default expiration offset (default: 600)
//! - `NOTIFICATION_SERVICE_SHUTDOWN_TIMEOUT_SECS` (optional): sweeper stop wait (default: 10)
//!
//! # Example
//!
//! ```bash
//! export NOTIFICATION_SERVICE_PORT="9000"
//! export NOTIFICATION_SERVICE_SWEEP_INTERVAL_SECS="5"
//! ```

use crate::error::ConfigError;
use crate::store::{DEFAULT_TTL_SECS, MAX_DEFAULT_TTL_SECS};
use crate::sweeper::{DEFAULT_SWEEP_INTERVAL_SECS, MAX_SWEEP_INTERVAL_SECS};
use chrono::Utc;
use std::time::Duration;

/// Largest configurable shutdown wait (5 minutes)
const MAX_SHUTDOWN_TIMEOUT_SECS: u64 = 300;

const HOST_KEY: &str = "NOTIFICATION_SERVICE_HOST";
const PORT_KEY: &str = "NOTIFICATION_SERVICE_PORT";
const SWEEP_INTERVAL_KEY: &str = "NOTIFICATION_SERVICE_SWEEP_INTERVAL_SECS";
const DEFAULT_TTL_KEY: &str = "NOTIFICATION_SERVICE_DEFAULT_TTL_SECS";
const SHUTDOWN_TIMEOUT_KEY: &str = "NOTIFICATION_SERVICE_SHUTDOWN_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Period between expiration sweeps
    pub sweep_interval: Duration,
    /// Expiration offset for notifications created without one
    pub default_ttl: Duration,
    /// How long to wait for the sweeper to stop on shutdown
    pub shutdown_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS as u64),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables, with defaults for unset keys
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ServiceConfig::default();

        let host = std::env::var(HOST_KEY)
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = match std::env::var(PORT_KEY) {
            Ok(_) => parse_env_var(PORT_KEY, defaults.port)?,
            Err(_) => parse_env_var("PORT", defaults.port)?,
        };

        let sweep_interval_secs =
            parse_env_var(SWEEP_INTERVAL_KEY, defaults.sweep_interval.as_secs())?;
        let default_ttl_secs = parse_env_var(DEFAULT_TTL_KEY, defaults.default_ttl.as_secs())?;
        let shutdown_timeout_secs =
            parse_env_var(SHUTDOWN_TIMEOUT_KEY, defaults.shutdown_timeout.as_secs())?;

        Ok(Self {
            host,
            port,
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            default_ttl: Duration::from_secs(default_ttl_secs),
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
        })
    }

    /// Check every value is non-zero and within its upper bound
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid(HOST_KEY, "host must not be empty"));
        }

        if self.port == 0 {
            return Err(invalid(PORT_KEY, "port must be greater than 0"));
        }

        if self.sweep_interval.is_zero() {
            return Err(invalid(
                SWEEP_INTERVAL_KEY,
                "sweep interval must be greater than 0 seconds",
            ));
        }

        if self.sweep_interval > Duration::from_secs(MAX_SWEEP_INTERVAL_SECS) {
            return Err(invalid(
                SWEEP_INTERVAL_KEY,
                &format!(
                    "sweep interval must not exceed {} seconds",
                    MAX_SWEEP_INTERVAL_SECS
                ),
            ));
        }

        if self.default_ttl.is_zero() {
            return Err(invalid(
                DEFAULT_TTL_KEY,
                "default ttl must be greater than 0 seconds",
            ));
        }

        if self.default_ttl > Duration::from_secs(MAX_DEFAULT_TTL_SECS) {
            return Err(invalid(
                DEFAULT_TTL_KEY,
                &format!("default ttl must not exceed {} seconds", MAX_DEFAULT_TTL_SECS),
            ));
        }

        let fits = chrono::Duration::from_std(self.default_ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .is_some();
        if !fits {
            return Err(invalid(DEFAULT_TTL_KEY, "default ttl is out of range"));
        }

        if self.shutdown_timeout.is_zero() {
            return Err(invalid(
                SHUTDOWN_TIMEOUT_KEY,
                "shutdown timeout must be greater than 0 seconds",
            ));
        }

        if self.shutdown_timeout > Duration::from_secs(MAX_SHUTDOWN_TIMEOUT_SECS) {
            return Err(invalid(
                SHUTDOWN_TIMEOUT_KEY,
                &format!(
                    "shutdown timeout must not exceed {} seconds",
                    MAX_SHUTDOWN_TIMEOUT_SECS
                ),
            ));
        }

        Ok(())
    }

    /// Default TTL as a calendar duration for the store
    pub fn default_ttl_chrono(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::from_std(self.default_ttl)
            .map_err(|e| invalid(DEFAULT_TTL_KEY, &e.to_string()))
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env_var<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::Parse {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .unwrap_or(Ok(default))
}

/// Load .env file if present
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_service_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.sweep_interval, Duration::from_secs(20));
        assert_eq!(config.default_ttl, Duration::from_secs(600));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_ttl_chrono() {
        let config = ServiceConfig::default();
        assert_eq!(
            config.default_ttl_chrono().unwrap(),
            chrono::Duration::minutes(10)
        );
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = ServiceConfig::default();
        config.port = 0;

        let err = config.validate().unwrap_err();
        assert_eq!(err.key(), PORT_KEY);
    }

    #[test]
    fn test_validation_empty_host() {
        let mut config = ServiceConfig::default();
        config.host = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_durations() {
        let mut config = ServiceConfig::default();
        config.sweep_interval = Duration::ZERO;
        assert_eq!(config.validate().unwrap_err().key(), SWEEP_INTERVAL_KEY);

        let mut config = ServiceConfig::default();
        config.default_ttl = Duration::ZERO;
        assert_eq!(config.validate().unwrap_err().key(), DEFAULT_TTL_KEY);

        let mut config = ServiceConfig::default();
        config.shutdown_timeout = Duration::ZERO;
        assert_eq!(config.validate().unwrap_err().key(), SHUTDOWN_TIMEOUT_KEY);
    }

    #[test]
    fn test_validation_rejects_oversized_default_ttl() {
        let mut config = ServiceConfig::default();
        config.default_ttl = Duration::from_secs(10_000_000_000_000);
        assert_eq!(config.validate().unwrap_err().key(), DEFAULT_TTL_KEY);

        config.default_ttl = Duration::from_secs(MAX_DEFAULT_TTL_SECS + 1);
        assert_eq!(config.validate().unwrap_err().key(), DEFAULT_TTL_KEY);

        config.default_ttl = Duration::from_secs(MAX_DEFAULT_TTL_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_oversized_sweep_interval() {
        let mut config = ServiceConfig::default();
        config.sweep_interval = Duration::from_secs(u64::MAX);
        assert_eq!(config.validate().unwrap_err().key(), SWEEP_INTERVAL_KEY);

        config.sweep_interval = Duration::from_secs(MAX_SWEEP_INTERVAL_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_oversized_shutdown_timeout() {
        let mut config = ServiceConfig::default();
        config.shutdown_timeout = Duration::from_secs(u64::MAX);
        assert_eq!(config.validate().unwrap_err().key(), SHUTDOWN_TIMEOUT_KEY);

        config.shutdown_timeout = Duration::from_secs(MAX_SHUTDOWN_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_service_config_from_env() {
        env::set_var(SWEEP_INTERVAL_KEY, "5");
        env::set_var(DEFAULT_TTL_KEY, "60");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.default_ttl, Duration::from_secs(60));

        env::set_var(SWEEP_INTERVAL_KEY, "-1");
        assert!(matches!(
            ServiceConfig::from_env(),
            Err(ConfigError::Parse { .. })
        ));

        env::remove_var(SWEEP_INTERVAL_KEY);
        env::remove_var(DEFAULT_TTL_KEY);
    }

    #[test]
    fn test_parse_env_var_with_default() {
        let result: u64 = parse_env_var("NOTIFICATION_SERVICE_TEST_UNSET", 42).unwrap();
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_env_var_with_value() {
        env::set_var("NOTIFICATION_SERVICE_TEST_SET", "100");
        let result: u64 = parse_env_var("NOTIFICATION_SERVICE_TEST_SET", 42).unwrap();
        assert_eq!(result, 100);
        env::remove_var("NOTIFICATION_SERVICE_TEST_SET");
    }

    #[test]
    fn test_parse_env_var_invalid_value() {
        env::set_var("NOTIFICATION_SERVICE_TEST_INVALID", "soon");
        let result: Result<u64, _> = parse_env_var("NOTIFICATION_SERVICE_TEST_INVALID", 42);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        env::remove_var("NOTIFICATION_SERVICE_TEST_INVALID");
    }
}
