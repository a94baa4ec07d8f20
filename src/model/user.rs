use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::asset::AssetRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User document as stored in the `users` collection.
///
/// `password` holds the Argon2 hash and must never reach an API response;
/// handlers shape users through the DTOs in `dto::user_dto`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: AssetRef,
    pub education: String,
    #[serde(default)]
    pub role: Role,
    pub password: String,
    /// Last session token issued to this user
    #[serde(default)]
    pub token: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_missing_role_defaults_to_user() {
        let doc = bson::doc! {
            "_id": ObjectId::new(),
            "name": "Jane",
            "email": "jane@example.com",
            "phone": "0123456789",
            "photo": { "public_id": "users/1.png", "url": "http://img/users/1.png" },
            "education": "BSc",
            "password": "hash",
            "createdAt": null,
            "updatedAt": null,
        };
        let user: User = bson::from_document(doc).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.token.is_none());
    }
}
