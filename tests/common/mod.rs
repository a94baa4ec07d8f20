#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use inkpost_backend::app::app::{build_router, AppParts};
use inkpost_backend::config::{AppConfig, JwtConfig};
use inkpost_backend::dto::upload_dto::UploadedFile;
use inkpost_backend::model::asset::AssetRef;
use inkpost_backend::model::blog::{Blog, BlogUpdate};
use inkpost_backend::model::user::{Role, User};
use inkpost_backend::repository::blog_repo::BlogRepository;
use inkpost_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use inkpost_backend::repository::user_repo::UserRepository;
use inkpost_backend::util::image_host::{ImageHost, ImageHostError};
use inkpost_backend::util::jwt::{Claims, JwtTokenUtils, JwtTokenUtilsImpl};
use inkpost_backend::util::password::{PasswordUtils, PasswordUtilsImpl};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// In-memory user store enforcing the same email/phone uniqueness as the Mongo indexes
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    pub fail_lookups: Arc<AtomicBool>,
}

impl MockUserRepository {
    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn remove(&self, id: &ObjectId) {
        self.users.lock().unwrap().retain(|u| u.id.as_ref() != Some(id));
    }

    fn check_available(&self) -> RepositoryResult<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(RepositoryError::ConnectionError("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email || u.phone == user.phone) {
            return Err(RepositoryError::AlreadyExists("E11000 duplicate key".to_string()));
        }
        user.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_role(&self, role: Role) -> RepositoryResult<Vec<User>> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| u.role == role).cloned().collect())
    }

    async fn set_token(&self, id: &ObjectId, token: &str) -> RepositoryResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                user.token = Some(token.to_string());
                Ok(())
            }
            None => Err(RepositoryError::not_found("user")),
        }
    }
}

/// In-memory blog store; `calls` counts every repository operation
#[derive(Clone, Default)]
pub struct MockBlogRepository {
    blogs: Arc<Mutex<Vec<Blog>>>,
    pub calls: Arc<AtomicUsize>,
}

impl MockBlogRepository {
    pub fn all(&self) -> Vec<Blog> {
        self.blogs.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlogRepository for MockBlogRepository {
    async fn insert(&self, mut blog: Blog) -> RepositoryResult<Blog> {
        self.touch();
        blog.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        blog.created_at = Some(now.clone());
        blog.updated_at = Some(now);
        self.blogs.lock().unwrap().push(blog.clone());
        Ok(blog)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Blog>> {
        self.touch();
        Ok(self.all())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Blog>> {
        self.touch();
        Ok(self.all().into_iter().find(|b| b.id.as_ref() == Some(id)))
    }

    async fn find_by_creator(&self, creator: &ObjectId) -> RepositoryResult<Vec<Blog>> {
        self.touch();
        Ok(self.all().into_iter().filter(|b| &b.created_by == creator).collect())
    }

    async fn update_fields(&self, id: &ObjectId, update: BlogUpdate) -> RepositoryResult<Option<Blog>> {
        self.touch();
        let mut blogs = self.blogs.lock().unwrap();
        let Some(blog) = blogs.iter_mut().find(|b| b.id.as_ref() == Some(id)) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            blog.title = title;
        }
        if let Some(category) = update.category {
            blog.category = category;
        }
        if let Some(about) = update.about {
            blog.about = about;
        }
        blog.updated_at = Some(chrono::Utc::now().to_rfc3339());
        Ok(Some(blog.clone()))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        self.touch();
        let mut blogs = self.blogs.lock().unwrap();
        let before = blogs.len();
        blogs.retain(|b| b.id.as_ref() != Some(id));
        Ok(blogs.len() < before)
    }
}

/// Image host that records uploads instead of storing them
#[derive(Clone, Default)]
pub struct MockImageHost {
    pub uploads: Arc<Mutex<Vec<(String, String, u64)>>>,
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<AssetRef, ImageHostError> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| ImageHostError::ReadError(e.to_string()))?;
        let mut uploads = self.uploads.lock().unwrap();
        let public_id = format!("{}/{}", folder, uploads.len() + 1);
        uploads.push((public_id.clone(), file.content_type.clone(), bytes.len() as u64));
        Ok(AssetRef {
            url: format!("http://images.test/{}", public_id),
            public_id,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: MockUserRepository,
    pub blogs: MockBlogRepository,
    pub images: MockImageHost,
    pub jwt: JwtTokenUtilsImpl,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_upload_limit(AppConfig::default().max_upload_bytes)
    }

    pub fn with_upload_limit(upload_limit: usize) -> Self {
        let users = MockUserRepository::default();
        let blogs = MockBlogRepository::default();
        let images = MockImageHost::default();
        let jwt = JwtTokenUtilsImpl::new(JwtConfig::default());

        let router = build_router(AppParts {
            jwt_utils: Arc::new(jwt.clone()),
            user_repo: Arc::new(users.clone()),
            blog_repo: Arc::new(blogs.clone()),
            image_host: Arc::new(images.clone()),
            secure_cookie: false,
            upload_limit,
        });

        TestApp { router, users, blogs, images, jwt }
    }

    /// Insert a user directly into the store with [`TEST_PASSWORD`]
    pub async fn seed_user(&self, name: &str, email: &str, phone: &str, role: Role) -> User {
        let password = PasswordUtilsImpl::hash_password(TEST_PASSWORD).unwrap();
        let user = User {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            photo: AssetRef {
                public_id: format!("users/{}", phone),
                url: format!("http://images.test/users/{}", phone),
            },
            education: "MSc".to_string(),
            role,
            password,
            token: None,
            created_at: None,
            updated_at: None,
        };
        self.users.insert(user).await.unwrap()
    }

    pub async fn seed_admin(&self) -> User {
        self.seed_user("Ada Admin", "ada@example.com", "0123456789", Role::Admin).await
    }

    /// `Cookie` header value carrying a fresh session token for `user`
    pub fn cookie_for(&self, user: &User) -> String {
        let token = self.jwt.generate_session_token(&user.id.unwrap().to_hex()).unwrap();
        format!("jwt={}", token)
    }

    pub fn jwt_claims(&self, token: &str) -> Claims {
        self.jwt.validate_session_token(token).unwrap()
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, headers, raw: bytes.to_vec() }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.raw).unwrap()
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

pub fn png<'a>(field: &'a str) -> FilePart<'a> {
    FilePart { field, file_name: "image.png", content_type: "image/png", data: b"\x89PNG fake image bytes" }
}

const BOUNDARY: &str = "inkpost-test-boundary";

pub fn multipart_request(uri: &str, fields: &[(&str, &str)], file: Option<FilePart<'_>>, cookie: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}
