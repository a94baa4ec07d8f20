pub mod upload_dto;
pub mod user_dto;
pub mod blog_dto;

use validator::ValidationErrors;

/// First message recorded against `field`, if validation flagged it
pub fn field_message(errors: &ValidationErrors, field: &str) -> Option<String> {
    errors
        .field_errors()
        .into_iter()
        .find(|(name, _)| &**name == field)
        .and_then(|(_, errs)| errs.first().cloned())
        .map(|err| match err.message {
            Some(message) => message.to_string(),
            None => format!("Invalid {}", field),
        })
}
