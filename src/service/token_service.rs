use axum_extra::extract::cookie::{Cookie, SameSite};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::jwt::JwtTokenUtils;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "jwt";

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub cookie: Cookie<'static>,
}

/// Signs session tokens, records the latest one on the user and builds the cookie
pub struct TokenIssuer {
    jwt_utils: Arc<dyn JwtTokenUtils>,
    user_repo: Arc<dyn UserRepository>,
    secure_cookie: bool,
}

impl TokenIssuer {
    pub fn new(jwt_utils: Arc<dyn JwtTokenUtils>, user_repo: Arc<dyn UserRepository>, secure_cookie: bool) -> Self {
        Self { jwt_utils, user_repo, secure_cookie }
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn issue(&self, user_id: &ObjectId) -> Result<IssuedToken, ServiceError> {
        let token = self.jwt_utils.generate_session_token(&user_id.to_hex()).map_err(|e| {
            error!("Failed to sign session token: {}", e);
            ServiceError::InternalError(format!("Token issuance failed: {}", e))
        })?;

        self.user_repo.set_token(user_id, &token).await.map_err(|e| {
            error!("Failed to record session token: {}", e);
            ServiceError::InternalError(format!("Token issuance failed: {}", e))
        })?;

        info!("Session token issued");
        Ok(IssuedToken {
            cookie: self.session_cookie(token.clone()),
            token,
        })
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure_cookie)
            .build()
    }
}

/// Cookie that, handed to `CookieJar::remove`, expires the session cookie
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
