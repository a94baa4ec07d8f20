pub mod repository_error;
pub mod mongo;
pub mod user_repo;
pub mod blog_repo;
