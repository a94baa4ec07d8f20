use crate::config::mongo_conf::MongoConfig;
use crate::model::blog::{Blog, BlogUpdate};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::{options::{FindOneAndUpdateOptions, ReturnDocument}, Database};
use tracing::{error, info, instrument};

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn insert(&self, blog: Blog) -> RepositoryResult<Blog>;
    async fn find_all(&self) -> RepositoryResult<Vec<Blog>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Blog>>;
    async fn find_by_creator(&self, creator: &ObjectId) -> RepositoryResult<Vec<Blog>>;
    /// Apply the supplied fields and return the document as it is after the update
    async fn update_fields(&self, id: &ObjectId, update: BlogUpdate) -> RepositoryResult<Option<Blog>>;
    /// Returns false when no blog had the given id
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
}

pub struct MongoBlogRepository {
    collection: mongodb::Collection<Blog>,
}

impl MongoBlogRepository {
    pub fn new(db: &Database, config: &MongoConfig) -> Self {
        let collection = db.collection::<Blog>(&config.blog_collection);
        MongoBlogRepository { collection }
    }

    async fn collect(&self, filter: Option<Document>) -> RepositoryResult<Vec<Blog>> {
        let cursor = self.collection.find(filter, None).await.map_err(|e| {
            error!("Failed to query blogs: {}", e);
            RepositoryError::from(e)
        })?;
        let blogs: Vec<Blog> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read blogs cursor: {}", e);
            RepositoryError::from(e)
        })?;
        info!("Fetched {} blogs", blogs.len());
        Ok(blogs)
    }
}

#[async_trait]
impl BlogRepository for MongoBlogRepository {
    #[instrument(skip(self, blog), fields(title = %blog.title))]
    async fn insert(&self, mut blog: Blog) -> RepositoryResult<Blog> {
        blog.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        blog.created_at = Some(now.clone());
        blog.updated_at = Some(now);
        match self.collection.insert_one(blog.clone(), None).await {
            Ok(_) => {
                info!("Blog created successfully");
                Ok(blog)
            }
            Err(e) => {
                error!("Failed to create blog: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Blog>> {
        self.collect(None).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Blog>> {
        let filter = doc! { "_id": id };
        self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to fetch blog by ID: {}", e);
            RepositoryError::from(e)
        })
    }

    #[instrument(skip(self), fields(creator = %creator))]
    async fn find_by_creator(&self, creator: &ObjectId) -> RepositoryResult<Vec<Blog>> {
        self.collect(Some(doc! { "createdBy": creator })).await
    }

    #[instrument(skip(self, update), fields(id = %id))]
    async fn update_fields(&self, id: &ObjectId, update: BlogUpdate) -> RepositoryResult<Option<Blog>> {
        let mut set = Document::new();
        if let Some(title) = update.title {
            set.insert("title", title);
        }
        if let Some(category) = update.category {
            set.insert("category", category.as_str());
        }
        if let Some(about) = update.about {
            set.insert("about", about);
        }
        set.insert("updatedAt", chrono::Utc::now().to_rfc3339());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let result = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await;
        match result {
            Ok(Some(blog)) => {
                info!("Blog updated successfully");
                Ok(Some(blog))
            }
            Ok(None) => {
                info!("No blog found to update");
                Ok(None)
            }
            Err(e) => {
                error!("Failed to update blog: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        match self.collection.delete_one(doc! { "_id": id }, None).await {
            Ok(result) => {
                info!("Deleted {} blog(s)", result.deleted_count);
                Ok(result.deleted_count > 0)
            }
            Err(e) => {
                error!("Failed to delete blog: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}
