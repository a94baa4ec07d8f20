pub mod multipart_form;
pub mod user_handler;
pub mod blog_handler;
