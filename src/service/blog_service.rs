use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::dto::upload_dto::UploadedFile;
use crate::model::blog::{Blog, BlogUpdate, Category};
use crate::model::user::User;
use crate::repository::blog_repo::BlogRepository;
use crate::util::error::ServiceError;
use crate::util::image_host::ImageHost;

pub const BLOG_IMAGE_FOLDER: &str = "blogs";
pub const BLOG_NOT_FOUND_MESSAGE: &str = "Blog not found";

/// Validated input for a new blog
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub category: Category,
    pub about: String,
}

#[async_trait]
pub trait BlogService: Send + Sync {
    async fn create(&self, author: &User, blog: NewBlog, image: &UploadedFile) -> Result<Blog, ServiceError>;
    async fn delete(&self, id: &ObjectId) -> Result<(), ServiceError>;
    async fn list_all(&self) -> Result<Vec<Blog>, ServiceError>;
    async fn get(&self, id: &ObjectId) -> Result<Blog, ServiceError>;
    async fn list_by_creator(&self, creator: &ObjectId) -> Result<Vec<Blog>, ServiceError>;
    async fn update(&self, id: &ObjectId, update: BlogUpdate) -> Result<Blog, ServiceError>;
}

pub struct BlogServiceImpl {
    pub blog_repo: Arc<dyn BlogRepository>,
    pub image_host: Arc<dyn ImageHost>,
}

impl BlogServiceImpl {
    pub fn new(blog_repo: Arc<dyn BlogRepository>, image_host: Arc<dyn ImageHost>) -> Self {
        Self { blog_repo, image_host }
    }
}

#[async_trait]
impl BlogService for BlogServiceImpl {
    #[instrument(skip(self, author, blog, image), fields(title = %blog.title, category = %blog.category))]
    async fn create(&self, author: &User, blog: NewBlog, image: &UploadedFile) -> Result<Blog, ServiceError> {
        info!("Creating blog");
        let created_by = author
            .id
            .ok_or_else(|| ServiceError::InternalError("Session user has no id".to_string()))?;

        let blog_image = self.image_host.upload(image, BLOG_IMAGE_FOLDER).await.map_err(|e| {
            error!("Failed to upload blog image: {}", e);
            ServiceError::InternalError(e.to_string())
        })?;

        let blog = Blog {
            id: None,
            title: blog.title,
            blog_image,
            category: blog.category,
            about: blog.about,
            admin_name: author.name.trim().to_string(),
            admin_photo: Some(author.photo.url.clone()),
            created_by,
            created_at: None,
            updated_at: None,
        };
        let blog = self.blog_repo.insert(blog).await?;
        info!("Blog created successfully");
        Ok(blog)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.blog_repo.delete(id).await? {
            warn!("No blog to delete");
            return Err(ServiceError::NotFound(BLOG_NOT_FOUND_MESSAGE.to_string()));
        }
        info!("Blog deleted successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Blog>, ServiceError> {
        Ok(self.blog_repo.find_all().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: &ObjectId) -> Result<Blog, ServiceError> {
        self.blog_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(BLOG_NOT_FOUND_MESSAGE.to_string()))
    }

    #[instrument(skip(self), fields(creator = %creator))]
    async fn list_by_creator(&self, creator: &ObjectId) -> Result<Vec<Blog>, ServiceError> {
        Ok(self.blog_repo.find_by_creator(creator).await?)
    }

    #[instrument(skip(self, update), fields(id = %id))]
    async fn update(&self, id: &ObjectId, update: BlogUpdate) -> Result<Blog, ServiceError> {
        self.blog_repo
            .update_fields(id, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(BLOG_NOT_FOUND_MESSAGE.to_string()))
    }
}
