use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::dto::blog_dto::{BlogResponse, CreateBlogRequest, CreateBlogResponse, UpdateBlogRequest};
use crate::dto::user_dto::MessageResponse;
use crate::handler::multipart_form::MultipartForm;
use crate::middlewares::auth_middleware::SessionContext;
use crate::service::blog_service::{BlogService, NewBlog};
use crate::util::error::HandlerError;

/// Parse a path id before anything touches the store
fn parse_blog_id(raw: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| {
        warn!("Rejected malformed blog id: {}", raw);
        HandlerError::bad_request("Invalid Blog ID")
    })
}

#[instrument(skip_all, fields(author = %session.user.email))]
pub async fn create_blog_handler(
    State(service): State<Arc<dyn BlogService>>,
    session: SessionContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut form = MultipartForm::parse(multipart).await?;

    let image = match form.take_file("blogImage") {
        Some(image) if !image.is_empty() => image,
        _ => return Err(HandlerError::bad_request("Blog image is required")),
    };
    if !image.is_allowed_image() {
        warn!("Rejected blog image with type {}", image.content_type);
        return Err(HandlerError::bad_request(
            "Invalid format. Allowed formats: image/jpeg, image/png, image/webp",
        ));
    }

    let (Some(title), Some(about)) = (form.text("title"), form.text("about")) else {
        return Err(HandlerError::bad_request("Title and about are required fields"));
    };
    let request = CreateBlogRequest {
        title: title.trim().to_string(),
        about: about.to_string(),
        category: form.text("category").map(str::to_string),
    };
    let category = request.check().map_err(HandlerError::bad_request)?;

    let blog = service
        .create(
            &session.user,
            NewBlog { title: request.title, category, about: request.about },
            &image,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBlogResponse {
            message: "Blog created successfully".to_string(),
            blog: BlogResponse::from(blog),
        }),
    ))
}

#[instrument(skip(service))]
pub async fn delete_blog_handler(
    State(service): State<Arc<dyn BlogService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HandlerError> {
    let id = parse_blog_id(&id)?;
    service.delete(&id).await?;
    info!("Blog {} deleted", id);
    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}

pub async fn all_blogs_handler(
    State(service): State<Arc<dyn BlogService>>,
) -> Result<Json<Vec<BlogResponse>>, HandlerError> {
    let blogs = service.list_all().await?;
    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

#[instrument(skip(service))]
pub async fn single_blog_handler(
    State(service): State<Arc<dyn BlogService>>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, HandlerError> {
    let id = parse_blog_id(&id)?;
    let blog = service.get(&id).await?;
    Ok(Json(BlogResponse::from(blog)))
}

#[instrument(skip_all, fields(author = %session.user.email))]
pub async fn my_blogs_handler(
    State(service): State<Arc<dyn BlogService>>,
    session: SessionContext,
) -> Result<Json<Vec<BlogResponse>>, HandlerError> {
    let creator = session
        .user
        .id
        .ok_or_else(|| HandlerError::internal("Session user without id", "missing _id"))?;
    let blogs = service.list_by_creator(&creator).await?;
    Ok(Json(blogs.into_iter().map(BlogResponse::from).collect()))
}

#[instrument(skip(service, payload))]
pub async fn update_blog_handler(
    State(service): State<Arc<dyn BlogService>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBlogRequest>, JsonRejection>,
) -> Result<Json<BlogResponse>, HandlerError> {
    let id = parse_blog_id(&id)?;
    let Json(payload) = payload.map_err(|e| {
        warn!("Rejected blog update body: {}", e);
        HandlerError::bad_request("Invalid request body")
    })?;
    let update = payload.into_update().map_err(HandlerError::bad_request)?;

    let blog = service.update(&id, update).await?;
    info!("Blog {} updated", id);
    Ok(Json(BlogResponse::from(blog)))
}
