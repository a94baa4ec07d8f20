use axum::{extract::DefaultBodyLimit, middleware, routing::{get, post}, Router};
use std::sync::Arc;

use crate::handler::user_handler::{
    admins_handler, login_handler, logout_handler, my_profile_handler, register_handler,
};
use crate::middlewares::auth_middleware::{authenticate, AuthState};
use crate::service::user_service::UserService;

/// Routes mounted under `/api/users`
pub fn user_router(service: Arc<dyn UserService>, auth_state: Arc<AuthState>, upload_limit: usize) -> Router {
    let public = Router::new()
        .route("/register", post(register_handler).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/login", post(login_handler))
        .route("/admins", get(admins_handler));

    let session = Router::new()
        .route("/logout", get(logout_handler))
        .route("/my-profile", get(my_profile_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate));

    public.merge(session).with_state(service)
}
