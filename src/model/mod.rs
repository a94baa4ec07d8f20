pub mod asset;
pub mod user;
pub mod blog;
