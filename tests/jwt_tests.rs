use chrono::{Duration, Utc};
use inkpost_backend::config::JwtConfig;
use inkpost_backend::util::jwt::*;

// Helper function to create JWT utils for testing
fn create_test_jwt_utils() -> JwtTokenUtilsImpl {
    JwtTokenUtilsImpl::new(JwtConfig::default())
}

const USER_ID: &str = "65f1c2a9b7e4d3a1c0f9e812";

#[test]
fn test_generate_and_validate_session_token() {
    let jwt_utils = create_test_jwt_utils();

    let token = jwt_utils.generate_session_token(USER_ID).unwrap();
    assert!(!token.is_empty());

    let claims = jwt_utils.validate_session_token(&token).unwrap();
    assert_eq!(claims.user_id, USER_ID);
}

#[test]
fn test_session_token_expires_after_configured_days() {
    let jwt_utils = create_test_jwt_utils();
    let token = jwt_utils.generate_session_token(USER_ID).unwrap();
    let claims = jwt_utils.validate_session_token(&token).unwrap();

    let expected = jwt_utils.jwt_config.token_expiration_days * 24 * 60 * 60;
    assert_eq!(claims.exp - claims.iat, expected);
    assert!(claims.exp > Utc::now().timestamp());
}

#[test]
fn test_claims_use_user_id_key() {
    let claims = Claims { user_id: USER_ID.to_string(), iat: 1, exp: 2 };
    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(json["userId"], USER_ID);
    assert!(json.get("user_id").is_none());
}

#[test]
fn test_expired_token_is_reported_as_expired() {
    let jwt_utils = create_test_jwt_utils();
    let token = jwt_utils
        .generate_token_expiring_at(USER_ID, Utc::now() - Duration::hours(2))
        .unwrap();

    let result = jwt_utils.validate_session_token(&token);
    assert!(matches!(result, Err(JwtError::TokenExpired)));
}

#[test]
fn test_token_signed_with_foreign_secret_is_invalid() {
    let foreign = JwtTokenUtilsImpl::new(JwtConfig {
        jwt_secret: "another-secret-that-is-also-long-enough-1234".to_string(),
        ..JwtConfig::default()
    });
    let token = foreign.generate_session_token(USER_ID).unwrap();

    let result = create_test_jwt_utils().validate_session_token(&token);
    assert!(matches!(result, Err(JwtError::InvalidToken(_))));
}

#[test]
fn test_expired_token_with_foreign_secret_is_invalid_not_expired() {
    let foreign = JwtTokenUtilsImpl::new(JwtConfig {
        jwt_secret: "another-secret-that-is-also-long-enough-1234".to_string(),
        ..JwtConfig::default()
    });
    let token = foreign
        .generate_token_expiring_at(USER_ID, Utc::now() - Duration::hours(2))
        .unwrap();

    let result = create_test_jwt_utils().validate_session_token(&token);
    assert!(matches!(result, Err(JwtError::InvalidToken(_))));
}

#[test]
fn test_garbage_tokens_are_invalid() {
    let jwt_utils = create_test_jwt_utils();
    for token in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
        let result = jwt_utils.validate_session_token(token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))), "token {:?} gave {:?}", token, result);
    }
}
