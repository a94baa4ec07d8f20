use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::dto::upload_dto::UploadedFile;
use crate::dto::user_dto::RegisterRequest;
use crate::model::user::{Role, User};
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepository;
use crate::service::token_service::{IssuedToken, TokenIssuer};
use crate::util::error::ServiceError;
use crate::util::image_host::ImageHost;
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

pub const USER_PHOTO_FOLDER: &str = "users";

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User already exists with this email";
pub const DUPLICATE_USER_MESSAGE: &str = "User already exists with this email or phone";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// A user together with the session token just issued for them
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user: User,
    pub issued: IssuedToken,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, request: RegisterRequest, role: Role, photo: &UploadedFile) -> Result<UserSession, ServiceError>;
    async fn login(&self, email: &str, password: &str, role: &str) -> Result<UserSession, ServiceError>;
    async fn list_admins(&self) -> Result<Vec<User>, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub image_host: Arc<dyn ImageHost>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        image_host: Arc<dyn ImageHost>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self { user_repo, image_host, token_issuer }
    }
}

async fn hash_password(password: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || PasswordUtilsImpl::hash_password(&password))
        .await
        .map_err(|e| ServiceError::InternalError(format!("Hashing task failed: {}", e)))?
        .map_err(|e| ServiceError::InternalError(e.to_string()))
}

async fn verify_password(password: String, hash: String) -> Result<bool, ServiceError> {
    tokio::task::spawn_blocking(move || PasswordUtilsImpl::verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::InternalError(format!("Verification task failed: {}", e)))?
        .map_err(|e| ServiceError::InternalError(e.to_string()))
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, request, photo), fields(email = %request.email, role = %role))]
    async fn register(&self, request: RegisterRequest, role: Role, photo: &UploadedFile) -> Result<UserSession, ServiceError> {
        info!("Registering new user");

        if self.user_repo.find_by_email(&request.email).await?.is_some() {
            warn!("Registration rejected, email already in use");
            return Err(ServiceError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
        }

        let photo_ref = self.image_host.upload(photo, USER_PHOTO_FOLDER).await.map_err(|e| {
            error!("Failed to upload user photo: {}", e);
            ServiceError::InternalError(e.to_string())
        })?;

        let password = hash_password(request.password).await?;

        let user = User {
            id: None,
            name: request.name.trim().to_string(),
            email: request.email,
            phone: request.phone,
            photo: photo_ref,
            education: request.education,
            role,
            password,
            token: None,
            created_at: None,
            updated_at: None,
        };

        let mut user = match self.user_repo.insert(user).await {
            Ok(user) => user,
            Err(RepositoryError::AlreadyExists(detail)) => {
                warn!("Registration lost a uniqueness race: {}", detail);
                return Err(ServiceError::Conflict(DUPLICATE_USER_MESSAGE.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let user_id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("Inserted user has no id".to_string()))?;

        let issued = self.token_issuer.issue(&user_id).await?;
        user.token = Some(issued.token.clone());

        info!("User registered successfully");
        Ok(UserSession { user, issued })
    }

    #[instrument(skip(self, password), fields(email = %email, role = %role))]
    async fn login(&self, email: &str, password: &str, role: &str) -> Result<UserSession, ServiceError> {
        info!("User login attempt");

        let mut user = match self.user_repo.find_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login rejected, unknown email");
                return Err(ServiceError::InvalidInput(INVALID_CREDENTIALS_MESSAGE.to_string()));
            }
        };

        if !verify_password(password.to_string(), user.password.clone()).await? {
            warn!("Login rejected, wrong password");
            return Err(ServiceError::InvalidInput(INVALID_CREDENTIALS_MESSAGE.to_string()));
        }

        if user.role.as_str() != role {
            warn!("Login rejected, role mismatch (stored {})", user.role);
            return Err(ServiceError::InvalidInput(format!("Given role {} not found", role)));
        }

        let user_id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("Stored user has no id".to_string()))?;
        let issued = self.token_issuer.issue(&user_id).await?;
        user.token = Some(issued.token.clone());

        info!("User logged in successfully");
        Ok(UserSession { user, issued })
    }

    #[instrument(skip(self))]
    async fn list_admins(&self) -> Result<Vec<User>, ServiceError> {
        let admins = self.user_repo.find_by_role(Role::Admin).await?;
        info!("Fetched {} admins", admins.len());
        Ok(admins)
    }
}
