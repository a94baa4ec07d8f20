use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::field_message;
use crate::model::asset::AssetRef;
use crate::model::blog::{Blog, BlogUpdate, Category};

pub const MIN_TITLE_LENGTH: u64 = 5;
pub const MIN_ABOUT_LENGTH: u64 = 200;

const TITLE_TOO_SHORT: &str = "Title should have at least 5 characters.";
const ABOUT_TOO_SHORT: &str = "About should have at least 200 characters.";

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|_| {
        let allowed: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("Invalid category {}. Allowed categories: {}", raw, allowed.join(", "))
    })
}

/// Text fields of the blog creation form; `title` is trimmed before it gets here
#[derive(Debug, Clone, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 5, message = "Title should have at least 5 characters."))]
    pub title: String,

    #[validate(length(min = 200, message = "About should have at least 200 characters."))]
    pub about: String,

    pub category: Option<String>,
}

impl CreateBlogRequest {
    /// Validates lengths and resolves the category, defaulting to `Other`
    pub fn check(&self) -> Result<Category, String> {
        if let Err(errors) = self.validate() {
            for field in ["title", "about"] {
                if let Some(message) = field_message(&errors, field) {
                    return Err(message);
                }
            }
        }
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(Category::default()),
            Some(raw) => parse_category(raw),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub about: Option<String>,
}

impl UpdateBlogRequest {
    /// Supplied fields must satisfy the same rules as on creation
    pub fn into_update(self) -> Result<BlogUpdate, String> {
        let title = self.title.map(|t| t.trim().to_string());
        if let Some(title) = &title {
            if (title.chars().count() as u64) < MIN_TITLE_LENGTH {
                return Err(TITLE_TOO_SHORT.to_string());
            }
        }
        if let Some(about) = &self.about {
            if (about.chars().count() as u64) < MIN_ABOUT_LENGTH {
                return Err(ABOUT_TOO_SHORT.to_string());
            }
        }
        let category = match self.category.as_deref() {
            Some(raw) => Some(parse_category(raw.trim())?),
            None => None,
        };
        Ok(BlogUpdate { title, category, about: self.about })
    }
}

/// Blog as returned by the API, ids rendered as hex strings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub blog_image: AssetRef,
    pub category: Category,
    pub about: String,
    pub admin_name: String,
    pub admin_photo: Option<String>,
    pub created_by: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        BlogResponse {
            id: blog.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: blog.title,
            blog_image: blog.blog_image,
            category: blog.category,
            about: blog.about,
            admin_name: blog.admin_name,
            admin_photo: blog.admin_photo,
            created_by: blog.created_by.to_hex(),
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogResponse {
    pub message: String,
    pub blog: BlogResponse,
}
