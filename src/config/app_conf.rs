use std::env;
use tracing::{debug, warn};

use crate::config::ConfigError;

const DEFAULT_MAX_UPLOAD_MB: usize = 25;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Deployment environment, e.g. "development" or "production"
    pub environment: String,
    /// Body limit for the multipart upload routes, in bytes
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("APP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::ParseError(format!("APP_PORT: {}", e)))?,
            Err(_) => {
                warn!("APP_PORT not set, using default: 8080");
                8080
            }
        };
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let max_upload_mb = match env::var("MAX_UPLOAD_MB") {
            Ok(raw) => {
                let mb = raw
                    .parse::<usize>()
                    .map_err(|e| ConfigError::ParseError(format!("MAX_UPLOAD_MB: {}", e)))?;
                if mb == 0 {
                    return Err(ConfigError::ValidationError("MAX_UPLOAD_MB must be greater than 0".to_string()));
                }
                mb
            }
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };
        debug!(
            "App host: {}, port: {}, environment: {}, max upload: {} MB",
            host, port, environment, max_upload_mb
        );
        Ok(AppConfig { host, port, environment, max_upload_bytes: max_upload_mb * 1024 * 1024 })
    }

    /// Session cookies carry the `Secure` flag only in production
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}
