use axum::{routing::get, Router};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::{AppConfig, JwtConfig, MinioConfig, MongoConfig};
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::blog_repo::{BlogRepository, MongoBlogRepository};
use crate::repository::mongo;
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::blog_router::blog_router;
use crate::router::user_router::user_router;
use crate::service::blog_service::{BlogService, BlogServiceImpl};
use crate::service::token_service::TokenIssuer;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::image_host::{ImageHost, MinioImageHost};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

/// Everything the router needs, already constructed
pub struct AppParts {
    pub jwt_utils: Arc<dyn JwtTokenUtils>,
    pub user_repo: Arc<dyn UserRepository>,
    pub blog_repo: Arc<dyn BlogRepository>,
    pub image_host: Arc<dyn ImageHost>,
    pub secure_cookie: bool,
    /// Body limit for the multipart upload routes, in bytes
    pub upload_limit: usize,
}

pub fn build_router(parts: AppParts) -> Router {
    let token_issuer = Arc::new(TokenIssuer::new(
        parts.jwt_utils.clone(),
        parts.user_repo.clone(),
        parts.secure_cookie,
    ));
    let auth_state = Arc::new(AuthState {
        jwt_utils: parts.jwt_utils,
        user_repo: parts.user_repo.clone(),
    });

    let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
        parts.user_repo,
        parts.image_host.clone(),
        token_issuer,
    ));
    let blog_service: Arc<dyn BlogService> = Arc::new(BlogServiceImpl::new(parts.blog_repo, parts.image_host));

    Router::new()
        .nest("/api/users", user_router(user_service, auth_state.clone(), parts.upload_limit))
        .nest("/api/blogs", blog_router(blog_service, auth_state, parts.upload_limit))
        .route("/health", get(|| async { "OK" }))
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn Error>> {
        let config = AppConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let minio_config = MinioConfig::from_env()?;

        let db = mongo::connect(&mongo_config).await?;
        let user_repo = MongoUserRepository::new(&db, &mongo_config);
        user_repo.ensure_indexes().await?;
        let blog_repo = MongoBlogRepository::new(&db, &mongo_config);

        let image_host = MinioImageHost::new(minio_config).await?;

        let router = build_router(AppParts {
            jwt_utils: Arc::new(JwtTokenUtilsImpl::new(jwt_config)),
            user_repo: Arc::new(user_repo),
            blog_repo: Arc::new(blog_repo),
            image_host: Arc::new(image_host),
            secure_cookie: config.is_production(),
            upload_limit: config.max_upload_bytes,
        });

        Ok(App { config, router })
    }

    pub async fn start(self) -> Result<(), Box<dyn Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind {}: {}", addr, e);
            e
        })?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
