use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::field_message;
use crate::model::asset::AssetRef;
use crate::model::user::{Role, User};

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Text fields of the registration form, in the order they are checked for presence
pub const REGISTER_FIELDS: [&str; 6] = ["email", "name", "password", "phone", "education", "role"];

#[derive(Debug, Clone, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,

    pub phone: String,

    pub education: String,

    pub role: String,
}

impl RegisterRequest {
    /// Format checks past field presence; returns the parsed role
    pub fn check(&self) -> Result<Role, String> {
        let errors = self.validate().err();
        let message_for = |field: &str| errors.as_ref().and_then(|e| field_message(e, field));

        if let Some(message) = message_for("name") {
            return Err(message);
        }
        if let Some(message) = message_for("email") {
            return Err(message);
        }
        if !is_valid_phone(&self.phone) {
            return Err("Phone number must be exactly 10 digits".to_string());
        }
        if let Some(message) = message_for("password") {
            return Err(message);
        }
        self.role
            .parse::<Role>()
            .map_err(|_| format!("Invalid role {}. Allowed roles: user, admin", self.role))
    }
}

/// Login body; fields are optional so a missing one can be reported by name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<T: Into<String>>(message: T) -> Self {
        MessageResponse { message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub education: String,
    pub photo: AssetRef,
    pub created_at: Option<String>,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        RegisteredUser {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            education: user.education.clone(),
            photo: user.photo.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedInUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for LoggedInUser {
    fn from(user: &User) -> Self {
        LoggedInUser {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoggedInUser,
    pub token: String,
}

/// Public view of a user: every stored field except the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub photo: AssetRef,
    pub education: String,
    pub role: Role,
    pub token: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            photo: user.photo.clone(),
            education: user.education.clone(),
            role: user.role,
            token: user.token.clone(),
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminsResponse {
    pub admins: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "supersecret".to_string(),
            phone: "0123456789".to_string(),
            education: "BSc".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn test_valid_request_yields_role() {
        assert_eq!(request().check(), Ok(Role::Admin));
    }

    #[test]
    fn test_phone_must_be_ten_digits() {
        let mut req = request();
        req.phone = "12345".to_string();
        assert_eq!(req.check().unwrap_err(), "Phone number must be exactly 10 digits");
        req.phone = "012345678a".to_string();
        assert!(req.check().is_err());
    }

    #[test]
    fn test_short_password_and_bad_email() {
        let mut req = request();
        req.password = "short".to_string();
        assert_eq!(req.check().unwrap_err(), "Password must be at least 8 characters long");

        let mut req = request();
        req.email = "not-an-email".to_string();
        assert_eq!(req.check().unwrap_err(), "Please enter a valid email");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let mut req = request();
        req.role = "superuser".to_string();
        assert!(req.check().unwrap_err().contains("superuser"));
    }

    #[test]
    fn test_user_response_has_no_password() {
        let user = User {
            id: Some(bson::oid::ObjectId::new()),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: "0123456789".to_string(),
            photo: AssetRef { public_id: "users/p.png".to_string(), url: "http://img/p.png".to_string() },
            education: "BSc".to_string(),
            role: Role::User,
            password: "$argon2id$hash".to_string(),
            token: None,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "user");
        assert!(json.get("_id").is_some());
    }
}
