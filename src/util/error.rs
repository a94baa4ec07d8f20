use axum::{response::{IntoResponse, Response}, http::StatusCode, Json};
use serde_json::json;
use std::fmt::Display;
use tracing::error;

use crate::repository::repository_error::RepositoryError;

/// Message returned to callers for any fault whose details stay server-side
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    Internal,
}

impl HandlerErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Forbidden => StatusCode::FORBIDDEN,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::BadRequest => "BadRequest",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::Forbidden => "Forbidden",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

/// Error returned by handlers and middlewares.
///
/// Validation and lookup failures render as `{"message": ...}`; authentication,
/// authorization and internal failures render as `{"error": ...}`.
#[derive(Debug)]
pub struct HandlerError {
    pub kind: HandlerErrorKind,
    pub message: String,
    body_key: &'static str,
}

impl HandlerError {
    pub fn new<T: Into<String>>(kind: HandlerErrorKind, message: T) -> Self {
        let body_key = match kind {
            HandlerErrorKind::NotFound | HandlerErrorKind::BadRequest => "message",
            HandlerErrorKind::Unauthorized | HandlerErrorKind::Forbidden | HandlerErrorKind::Internal => "error",
        };
        HandlerError { kind, message: message.into(), body_key }
    }

    /// Render under `"error"` regardless of kind
    pub fn in_error_field(mut self) -> Self {
        self.body_key = "error";
        self
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::BadRequest, message)
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::NotFound, message)
    }

    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Unauthorized, message)
    }

    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Forbidden, message)
    }

    /// Log the underlying fault and hide it behind the generic message
    pub fn internal(context: &str, err: impl Display) -> Self {
        error!("{}: {}", context, err);
        Self::new(HandlerErrorKind::Internal, INTERNAL_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        body.insert(self.body_key.to_string(), json!(self.message));
        (self.status(), Json(serde_json::Value::Object(body))).into_response()
    }
}


#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Invalid Input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            RepositoryError::DatabaseError(msg)
            | RepositoryError::ConnectionError(msg)
            | RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
        }
    }
}

/// Services carry caller-facing text in NotFound/InvalidInput/Conflict;
/// InternalError text is logged and replaced.
impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => HandlerError::not_found(msg),
            ServiceError::InvalidInput(msg) | ServiceError::Conflict(msg) => HandlerError::bad_request(msg),
            ServiceError::InternalError(msg) => HandlerError::internal("Service failure", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(HandlerError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(HandlerError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(HandlerError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(HandlerError::not_found("x").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = HandlerError::from(ServiceError::InternalError("mongo exploded".to_string()));
        assert_eq!(err.kind, HandlerErrorKind::Internal);
        assert_eq!(err.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_error_field_override() {
        let err = HandlerError::not_found("User not found").in_error_field();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body_key, "error");
        assert_eq!(HandlerError::not_found("x").body_key, "message");
    }

    #[test]
    fn test_duplicate_key_maps_to_conflict() {
        let err = ServiceError::from(RepositoryError::AlreadyExists("dup".to_string()));
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(HandlerError::from(err).status(), StatusCode::BAD_REQUEST);
    }
}
