pub mod user_router;
pub mod blog_router;
