use crate::config::mongo_conf::MongoConfig;
use crate::model::user::{Role, User};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::{options::IndexOptions, Database, IndexModel};
use tracing::{error, info, instrument};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_role(&self, role: Role) -> RepositoryResult<Vec<User>>;
    /// Record the most recently issued session token on the user document
    async fn set_token(&self, id: &ObjectId, token: &str) -> RepositoryResult<()>;
}

pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database, config: &MongoConfig) -> Self {
        let collection = db.collection::<User>(&config.user_collection);
        MongoUserRepository { collection }
    }

    /// Create the unique indexes backing the email and phone invariants
    #[instrument(skip(self))]
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();
        let indexes = vec![
            IndexModel::builder().keys(doc! { "email": 1 }).options(unique()).build(),
            IndexModel::builder().keys(doc! { "phone": 1 }).options(unique()).build(),
        ];
        self.collection.create_indexes(indexes, None).await.map_err(|e| {
            error!("Failed to create user indexes: {}", e);
            RepositoryError::from(e)
        })?;
        info!("User indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let filter = doc! { "_id": id };
        let user = self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to find user by id: {}", e);
            RepositoryError::from(e)
        })?;
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email };
        let user = self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to find user by email: {}", e);
            RepositoryError::from(e)
        })?;
        Ok(user)
    }

    #[instrument(skip(self), fields(role = %role))]
    async fn find_by_role(&self, role: Role) -> RepositoryResult<Vec<User>> {
        let filter = doc! { "role": role.as_str() };
        let cursor = self.collection.find(filter, None).await.map_err(|e| {
            error!("Failed to query users by role: {}", e);
            RepositoryError::from(e)
        })?;
        let users: Vec<User> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read users cursor: {}", e);
            RepositoryError::from(e)
        })?;
        info!("Fetched {} users", users.len());
        Ok(users)
    }

    #[instrument(skip(self, token), fields(id = %id))]
    async fn set_token(&self, id: &ObjectId, token: &str) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "token": token, "updatedAt": chrono::Utc::now().to_rfc3339() } };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) if result.matched_count > 0 => Ok(()),
            Ok(_) => {
                error!("No user found to store token for ID: {}", id);
                Err(RepositoryError::not_found(format!("No user found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to store token: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}
