use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Minimum accepted length of the signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime in days
    pub token_expiration_days: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    /// 
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required)
    /// - JWT_EXPIRES_IN_DAYS: Session token lifetime in days (defaults to 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| {
                error!("JWT_SECRET environment variable not found");
                ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
            })?;
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let token_expiration_days = env::var("JWT_EXPIRES_IN_DAYS")
            .unwrap_or_else(|_| {
                warn!("JWT_EXPIRES_IN_DAYS not set, using default: 30 days");
                "30".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_EXPIRES_IN_DAYS value: {}", e);
                ConfigError::ParseError(format!("JWT_EXPIRES_IN_DAYS: {}", e))
            })?;
        debug!("JWT token expiration: {} days", token_expiration_days);

        let config = JwtConfig {
            jwt_secret,
            token_expiration_days,
        };

        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Validating JWT configuration");

        if self.jwt_secret.is_empty() {
            error!("JWT secret cannot be empty");
            return Err(ConfigError::ValidationError("JWT secret cannot be empty".to_string()));
        }

        if self.jwt_secret.len() < MIN_SECRET_LENGTH {
            error!("JWT secret is too short (minimum {} characters required)", MIN_SECRET_LENGTH);
            return Err(ConfigError::ValidationError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LENGTH
            )));
        }

        if self.token_expiration_days <= 0 {
            error!("Token expiration must be greater than 0");
            return Err(ConfigError::ValidationError("Token expiration must be greater than 0".to_string()));
        }

        debug!("JWT configuration validation passed");
        Ok(())
    }
}

/// Create JWT configuration for testing with default values
impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            token_expiration_days: 30,
        }
    }
}
