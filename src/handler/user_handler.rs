use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dto::user_dto::{
    AdminsResponse, LoggedInUser, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RegisterRequest, RegisterResponse, RegisteredUser, UserResponse, REGISTER_FIELDS,
};
use crate::handler::multipart_form::MultipartForm;
use crate::middlewares::auth_middleware::SessionContext;
use crate::service::token_service::clear_session_cookie;
use crate::service::user_service::UserService;
use crate::util::error::HandlerError;

fn missing_field(name: &str) -> HandlerError {
    HandlerError::bad_request(format!("Missing field: {}", name))
}

fn required(name: &str, value: Option<String>) -> Result<String, HandlerError> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| missing_field(name))
}

#[instrument(skip_all)]
pub async fn register_handler(
    State(service): State<Arc<dyn UserService>>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut form = MultipartForm::parse(multipart).await?;

    let photo = match form.take_file("photo") {
        Some(photo) if !photo.is_empty() => photo,
        _ => return Err(HandlerError::bad_request("User photo is required")),
    };
    if !photo.is_allowed_image() {
        warn!("Rejected photo with type {}", photo.content_type);
        return Err(HandlerError::bad_request("Invalid photo format. Only jpg, png, and webp are allowed"));
    }

    for field in REGISTER_FIELDS {
        if form.text(field).is_none() {
            return Err(missing_field(field));
        }
    }
    let value = |name: &str| form.text(name).unwrap_or_default().trim().to_string();
    let request = RegisterRequest {
        name: value("name"),
        email: value("email"),
        password: form.text("password").unwrap_or_default().to_string(),
        phone: value("phone"),
        education: value("education"),
        role: value("role"),
    };
    let role = request.check().map_err(HandlerError::bad_request)?;

    let session = service.register(request, role, &photo).await?;
    info!("User registered: {}", session.user.email);

    let body = RegisterResponse {
        message: "User registered successfully".to_string(),
        user: RegisteredUser::from(&session.user),
        token: session.issued.token,
    };
    Ok((StatusCode::CREATED, jar.add(session.issued.cookie), Json(body)))
}

#[instrument(skip_all)]
pub async fn login_handler(
    State(service): State<Arc<dyn UserService>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("Rejected login body: {}", e);
        HandlerError::bad_request("Invalid request body")
    })?;

    let email = required("email", payload.email)?;
    let password = required("password", payload.password)?;
    let role = required("role", payload.role)?;

    let session = service.login(email.trim(), &password, role.trim()).await?;

    let body = LoginResponse {
        message: "User logged in successfully".to_string(),
        user: LoggedInUser::from(&session.user),
        token: session.issued.token,
    };
    Ok((jar.add(session.issued.cookie), Json(body)))
}

#[instrument(skip_all, fields(user = %session.user.email))]
pub async fn logout_handler(session: SessionContext, jar: CookieJar) -> impl IntoResponse {
    info!("User logged out");
    (
        jar.remove(clear_session_cookie()),
        Json(MessageResponse::new("User logged out successfully")),
    )
}

pub async fn my_profile_handler(session: SessionContext) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: UserResponse::from(&session.user) })
}

#[instrument(skip_all)]
pub async fn admins_handler(State(service): State<Arc<dyn UserService>>) -> Result<Json<AdminsResponse>, HandlerError> {
    let admins = service.list_admins().await?;
    Ok(Json(AdminsResponse { admins: admins.iter().map(UserResponse::from).collect() }))
}
