use fses::fses_core::{hash_password, verify_password};
use fses::fses_models::lecturers::derive_username;

#[test]
fn test_hash_and_verify() {
    let hash = hash_password("password123").unwrap();

    assert_ne!(hash, "password123");
    assert!(hash.starts_with("$2"));
    assert!(verify_password("password123", &hash).unwrap());
    assert!(!verify_password("Password123", &hash).unwrap());
}

#[test]
fn test_provisioned_password_is_the_username() {
    let username = derive_username("Dr. Ahmad Rahman").unwrap();
    let hash = hash_password(&username).unwrap();

    assert!(verify_password("rahman", &hash).unwrap());
    assert!(!verify_password("Rahman", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = hash_password("samepassword").unwrap();
    let second = hash_password("samepassword").unwrap();

    assert_ne!(first, second);
    assert!(verify_password("samepassword", &first).unwrap());
    assert!(verify_password("samepassword", &second).unwrap());
}

#[test]
fn test_non_ascii_password() {
    let password = "kata-laluan-ŝekura-密码";
    let hash = hash_password(password).unwrap();

    assert!(verify_password(password, &hash).unwrap());
}

#[test]
fn test_invalid_hash_is_an_error() {
    let err = verify_password("whatever", "not_a_valid_bcrypt_hash").unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
}
