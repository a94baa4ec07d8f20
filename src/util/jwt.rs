use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::JwtConfig;

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Id of the user the session belongs to
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Error types for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => JwtError::InvalidToken(err.to_string()),
            _ => JwtError::DecodingFailed(err.to_string()),
        }
    }
}

pub trait JwtTokenUtils: Send + Sync {
    fn generate_session_token(&self, user_id: &str) -> Result<String, JwtError>;
    fn validate_session_token(&self, token: &str) -> Result<Claims, JwtError>;
}

#[derive(Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(jwt_config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(jwt_config.jwt_secret.as_bytes());
        JwtTokenUtilsImpl {
            jwt_config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a session token for `user_id` that expires at `expires_at`
    pub fn generate_token_expiring_at(&self, user_id: &str, expires_at: DateTime<Utc>) -> Result<String, JwtError> {
        debug!("Generating session token for user: {}", user_id);

        let claims = Claims {
            user_id: user_id.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        match encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key) {
            Ok(token) => {
                info!("Successfully generated session token for user: {}", user_id);
                Ok(token)
            }
            Err(err) => {
                error!("Failed to encode JWT token: {}", err);
                Err(JwtError::EncodingFailed(err.to_string()))
            }
        }
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn generate_session_token(&self, user_id: &str) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::days(self.jwt_config.token_expiration_days);
        self.generate_token_expiring_at(user_id, expires_at)
    }

    fn validate_session_token(&self, token: &str) -> Result<Claims, JwtError> {
        debug!("Validating session token");

        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(token_data) => {
                debug!("Token validation successful for user: {}", token_data.claims.user_id);
                Ok(token_data.claims)
            }
            Err(err) => {
                let err = JwtError::from(err);
                warn!("Session token rejected: {}", err);
                Err(err)
            }
        }
    }
}
