use inkpost_backend::util::password::*;

#[test]
fn test_hash_and_verify_password() {
    let hash = PasswordUtilsImpl::hash_password("MySecurePassword123").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert_ne!(hash, "MySecurePassword123");

    assert!(PasswordUtilsImpl::verify_password("MySecurePassword123", &hash).unwrap());
    assert!(!PasswordUtilsImpl::verify_password("WrongPassword", &hash).unwrap());
}

#[test]
fn test_same_password_gets_distinct_salts() {
    let first = PasswordUtilsImpl::hash_password("repeatable-password").unwrap();
    let second = PasswordUtilsImpl::hash_password("repeatable-password").unwrap();
    assert_ne!(first, second);
    assert!(PasswordUtilsImpl::verify_password("repeatable-password", &second).unwrap());
}

#[test]
fn test_verify_against_malformed_hash() {
    let result = PasswordUtilsImpl::verify_password("anything", "plain-text-not-a-hash");
    assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
}
