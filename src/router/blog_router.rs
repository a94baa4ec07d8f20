use axum::{extract::DefaultBodyLimit, middleware, routing::{delete, get, post, put}, Router};
use std::sync::Arc;

use crate::handler::blog_handler::{
    all_blogs_handler, create_blog_handler, delete_blog_handler, my_blogs_handler,
    single_blog_handler, update_blog_handler,
};
use crate::middlewares::auth_middleware::{authenticate, AuthState};
use crate::middlewares::role_middleware::{require_role, ADMIN_ONLY};
use crate::service::blog_service::BlogService;

/// Routes mounted under `/api/blogs`
pub fn blog_router(service: Arc<dyn BlogService>, auth_state: Arc<AuthState>, upload_limit: usize) -> Router {
    let public = Router::new().route("/all-blogs", get(all_blogs_handler));

    let session = Router::new()
        .route("/single-blog/{id}", get(single_blog_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), authenticate));

    // Layers run last-added first: authenticate, then the role gate
    let admin = Router::new()
        .route("/create", post(create_blog_handler).layer(DefaultBodyLimit::max(upload_limit)))
        .route("/delete/{id}", delete(delete_blog_handler))
        .route("/my-blog", get(my_blogs_handler))
        .route("/update/{id}", put(update_blog_handler))
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_role))
        .route_layer(middleware::from_fn_with_state(auth_state, authenticate));

    public.merge(session).merge(admin).with_state(service)
}
