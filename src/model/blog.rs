use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::asset::AssetRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    Devotion,
    Sports,
    Coding,
    Entertainment,
    Business,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Devotion,
        Category::Sports,
        Category::Coding,
        Category::Entertainment,
        Category::Business,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Devotion => "Devotion",
            Category::Sports => "Sports",
            Category::Coding => "Coding",
            Category::Entertainment => "Entertainment",
            Category::Business => "Business",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Blog document as stored in the `blogs` collection.
///
/// `admin_name` and `admin_photo` are copied from the creator at creation
/// time and are not refreshed when the creator's profile changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub blog_image: AssetRef,
    #[serde(default)]
    pub category: Category,
    pub about: String,
    pub admin_name: String,
    pub admin_photo: Option<String>,
    pub created_by: ObjectId,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Fields a caller may replace on an existing blog; `None` leaves the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub about: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_exact() {
        assert_eq!("Coding".parse::<Category>().unwrap(), Category::Coding);
        assert!("coding".parse::<Category>().is_err());
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn test_blog_document_uses_camel_case_keys() {
        let blog = Blog {
            id: Some(ObjectId::new()),
            title: "Hello".to_string(),
            blog_image: AssetRef { public_id: "blogs/x.png".to_string(), url: "http://img/x.png".to_string() },
            category: Category::Sports,
            about: "a".repeat(200),
            admin_name: "Admin".to_string(),
            admin_photo: None,
            created_by: ObjectId::new(),
            created_at: None,
            updated_at: None,
        };
        let doc = bson::to_document(&blog).unwrap();
        assert!(doc.contains_key("blogImage"));
        assert!(doc.contains_key("createdBy"));
        assert_eq!(doc.get_str("category").unwrap(), "Sports");
    }
}
