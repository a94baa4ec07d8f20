use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::model::user::User;
use crate::repository::user_repo::UserRepository;
use crate::service::token_service::SESSION_COOKIE;
use crate::util::error::{HandlerError, HandlerErrorKind, INTERNAL_ERROR_MESSAGE};
use crate::util::jwt::{JwtError, JwtTokenUtils};

pub const NO_TOKEN_MESSAGE: &str = "No token provided, user not authenticated";
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expired, please log in again";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token, user not authenticated";
pub const AUTH_INTERNAL_MESSAGE: &str = "Internal server error during authentication";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

pub struct AuthState {
    pub jwt_utils: Arc<dyn JwtTokenUtils>,
    pub user_repo: Arc<dyn UserRepository>,
}

/// The authenticated user, attached to the request by [`authenticate`]
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: User,
}

fn auth_internal(context: &str, err: impl std::fmt::Display) -> HandlerError {
    error!("{}: {}", context, err);
    HandlerError::new(HandlerErrorKind::Internal, AUTH_INTERNAL_MESSAGE)
}

/// Resolve the `jwt` cookie to a user and attach a [`SessionContext`]
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let token = match jar.get(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => {
            debug!("Request without session cookie");
            return Err(HandlerError::unauthorized(NO_TOKEN_MESSAGE));
        }
    };

    let claims = match state.jwt_utils.validate_session_token(&token) {
        Ok(claims) => claims,
        Err(JwtError::TokenExpired) => return Err(HandlerError::unauthorized(TOKEN_EXPIRED_MESSAGE)),
        Err(JwtError::InvalidToken(_)) => return Err(HandlerError::unauthorized(INVALID_TOKEN_MESSAGE)),
        Err(e) => return Err(auth_internal("Token verification failed", e)),
    };

    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => {
            warn!("Session token carries a malformed user id");
            return Err(HandlerError::unauthorized(INVALID_TOKEN_MESSAGE));
        }
    };

    let user = match state.user_repo.find_by_id(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Session token refers to a missing user: {}", user_id);
            return Err(HandlerError::not_found(USER_NOT_FOUND_MESSAGE).in_error_field());
        }
        Err(e) => return Err(auth_internal("User lookup during authentication failed", e)),
    };

    debug!("Authenticated user {}", user_id);
    req.extensions_mut().insert(SessionContext { user });
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionContext>() {
            Some(ctx) => Ok(ctx.clone()),
            None => {
                error!("Handler requires a session but the authenticate middleware did not run");
                Err(HandlerError::new(HandlerErrorKind::Internal, INTERNAL_ERROR_MESSAGE))
            }
        }
    }
}
