pub mod jwt;
pub mod image_host;
pub mod password;
pub mod logger;
pub mod error;
