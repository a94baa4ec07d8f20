use async_trait::async_trait;
use minio::s3::args::{BucketExistsArgs, MakeBucketArgs, PutObjectArgs};
use minio::s3::client::{Client, ClientBuilder};
use minio::s3::creds::StaticProvider;
use minio::s3::http::BaseUrl;
use std::io::Cursor;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::MinioConfig;
use crate::dto::upload_dto::UploadedFile;
use crate::model::asset::AssetRef;

#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Failed to read uploaded file: {0}")]
    ReadError(String),
}

/// External store for user photos and blog cover images
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Store `file` under `folder` and return its public reference
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<AssetRef, ImageHostError>;
}

#[derive(Debug, Clone)]
pub struct MinioImageHost {
    client: Client,
    pub config: MinioConfig,
}

impl MinioImageHost {
    #[instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket_name))]
    pub async fn new(config: MinioConfig) -> Result<Self, ImageHostError> {
        info!("Initializing MinIO image host");

        config.validate().map_err(|e| {
            error!("MinIO configuration validation failed: {}", e);
            ImageHostError::ConfigError(e.to_string())
        })?;

        let base_url = config.get_endpoint_url().parse::<BaseUrl>().map_err(|e| {
            error!("Failed to parse MinIO endpoint URL: {}", e);
            ImageHostError::ConnectionError(format!("Invalid endpoint URL: {}", e))
        })?;

        let static_provider = StaticProvider::new(&config.access_key, &config.secret_key, None);

        let client = ClientBuilder::new(base_url)
            .provider(Some(Box::new(static_provider)))
            .build()
            .map_err(|e| {
                error!("Failed to create MinIO client: {}", e);
                ImageHostError::ConnectionError(format!("Client creation failed: {}", e))
            })?;

        let host = Self { client, config };
        host.ensure_bucket_exists().await?;

        info!("MinIO image host initialized successfully");
        Ok(host)
    }

    #[instrument(skip(self))]
    async fn ensure_bucket_exists(&self) -> Result<(), ImageHostError> {
        let bucket_exists_args = BucketExistsArgs::new(&self.config.bucket_name)
            .map_err(|e| ImageHostError::ConfigError(e.to_string()))?;

        let exists = self.client.bucket_exists(&bucket_exists_args).await.map_err(|e| {
            error!("Failed to check if bucket exists: {}", e);
            ImageHostError::ConnectionError(format!("Bucket exists check failed: {}", e))
        })?;

        if exists {
            debug!("Bucket '{}' already exists", self.config.bucket_name);
            return Ok(());
        }

        warn!("Bucket '{}' does not exist, creating it", self.config.bucket_name);

        let make_bucket_args = MakeBucketArgs::new(&self.config.bucket_name)
            .map_err(|e| ImageHostError::ConfigError(e.to_string()))?;

        self.client.make_bucket(&make_bucket_args).await.map_err(|e| {
            error!("Failed to create bucket '{}': {}", self.config.bucket_name, e);
            ImageHostError::ConnectionError(format!("Bucket creation failed: {}", e))
        })?;

        info!("Created bucket '{}'", self.config.bucket_name);
        Ok(())
    }
}

/// Object key for a new upload: `<folder>/<uuid>.<ext>`
pub fn object_name_for(folder: &str, file: &UploadedFile) -> String {
    let id = Uuid::new_v4();
    match file.extension() {
        Some(ext) => format!("{}/{}.{}", folder.trim_matches('/'), id, ext),
        None => format!("{}/{}", folder.trim_matches('/'), id),
    }
}

#[async_trait]
impl ImageHost for MinioImageHost {
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.size))]
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<AssetRef, ImageHostError> {
        let data = tokio::fs::read(file.path()).await.map_err(|e| {
            error!("Failed to read spooled upload '{}': {}", file.file_name, e);
            ImageHostError::ReadError(e.to_string())
        })?;

        let object_name = object_name_for(folder, file);
        info!("Uploading '{}' to bucket '{}'", object_name, self.config.bucket_name);

        let bucket_name = self.config.bucket_name.clone();
        let object_name_owned = object_name.clone();
        let client = self.client.clone();
        let content_type = file.content_type.clone();

        // PutObjectArgs borrows a `dyn Read`, which keeps the request future off the async executor
        tokio::task::spawn_blocking(move || {
            let mut reader = Cursor::new(data);
            let data_len = reader.get_ref().len();

            let mut args = PutObjectArgs::new(&bucket_name, &object_name_owned, &mut reader, Some(data_len), None)
                .map_err(|e| ImageHostError::UploadFailed(e.to_string()))?;
            args.content_type = &content_type;

            futures::executor::block_on(client.put_object(&mut args))
                .map_err(|e| ImageHostError::UploadFailed(e.to_string()))?;
            Ok::<(), ImageHostError>(())
        })
        .await
        .map_err(|e| {
            error!("Failed to join blocking upload task: {}", e);
            ImageHostError::UploadFailed(format!("Join error: {}", e))
        })??;

        info!("Uploaded '{}'", object_name);
        Ok(AssetRef {
            url: self.config.object_url(&object_name),
            public_id: object_name,
        })
    }
}
