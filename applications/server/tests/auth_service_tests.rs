//! Authentication service tests
//! Password hashing, token issue and validation, and the repository-backed
//! login path
mod common;

use anuraagam_core::User;
use anuraagam_server::{
    repository::{MemoryUserRepository, UserRepository},
    services::auth::{AuthService, Claims},
};
use chrono::{Duration, Utc};
use common::fixtures;
use jsonwebtoken::{encode, EncodingKey, Header};

fn create_test_auth_service() -> AuthService {
    AuthService::new("test-secret-key".to_string(), 1).with_bcrypt_cost(4)
}

/// Test password hashing produces valid bcrypt hashes
#[tokio::test]
async fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123!";
    let hash = auth_service.hash_password(password).unwrap();

    // bcrypt starts with $2b$ or $2a$
    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));
    assert!(hash.len() > 50);

    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2, "Hashes should differ due to random salt");
}

#[tokio::test]
async fn test_password_verification() {
    let auth_service = create_test_auth_service();
    let hash = auth_service.hash_password("MySecurePassword123!").unwrap();

    assert!(auth_service
        .verify_password("MySecurePassword123!", &hash)
        .unwrap());
    assert!(!auth_service.verify_password("WrongPassword", &hash).unwrap());
}

#[tokio::test]
async fn test_password_verification_invalid_hash() {
    let auth_service = create_test_auth_service();

    let result = auth_service.verify_password("password", "not-a-valid-hash");
    assert!(result.is_err(), "Invalid hash should return error");
}

#[tokio::test]
async fn test_access_token_carries_identity() {
    let auth_service = create_test_auth_service();
    let user = User::new(fixtures::TEST_USERNAME);

    let token = auth_service.create_access_token(&user).unwrap();
    assert!(!token.is_empty());

    let identity = auth_service.verify_access_token(&token).unwrap();
    assert_eq!(identity.user_id, user.id);
    assert_eq!(identity.username, fixtures::TEST_USERNAME);
}

#[tokio::test]
async fn test_token_validation_invalid_signature() {
    let auth_service = create_test_auth_service();

    let other_auth = AuthService::new("different-secret".to_string(), 1);
    let token = other_auth
        .create_access_token(&User::new("someone"))
        .unwrap();

    assert!(auth_service.verify_access_token(&token).is_err());
}

#[tokio::test]
async fn test_token_validation_malformed() {
    let auth_service = create_test_auth_service();

    assert!(auth_service
        .verify_access_token("not.a.valid.jwt.token")
        .is_err());
    assert!(auth_service.verify_access_token("").is_err());
}

/// Expired tokens are rejected (past the default 60s leeway)
#[tokio::test]
async fn test_expired_token_rejected() {
    let auth_service = create_test_auth_service();
    let issued = Utc::now() - Duration::hours(3);

    let claims = Claims {
        sub: "user-1".to_string(),
        name: "old".to_string(),
        exp: (issued + Duration::hours(1)).timestamp(),
        iat: issued.timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret-key"),
    )
    .unwrap();

    assert!(auth_service.verify_access_token(&token).is_err());
}

/// Create, look up, verify and issue a token
#[tokio::test]
async fn test_complete_authentication_flow() {
    let users = MemoryUserRepository::new();
    let auth_service = create_test_auth_service();

    let hash = auth_service.hash_password(fixtures::TEST_PASSWORD).unwrap();
    let user = users.create(fixtures::TEST_USERNAME, &hash).await.unwrap();

    let record = users
        .find_by_username(fixtures::TEST_USERNAME)
        .await
        .unwrap()
        .unwrap();
    assert!(auth_service
        .verify_password(fixtures::TEST_PASSWORD, &record.password_hash)
        .unwrap());

    let token = auth_service.create_access_token(&record.user).unwrap();
    let identity = auth_service.verify_access_token(&token).unwrap();
    assert_eq!(identity.user_id, user.id);
}

#[tokio::test]
async fn test_multiple_users_authentication() {
    let users = MemoryUserRepository::new();
    let auth_service = create_test_auth_service();

    let hash1 = auth_service.hash_password("Password1!").unwrap();
    users.create("user1", &hash1).await.unwrap();
    let hash2 = auth_service.hash_password("Password2!").unwrap();
    users.create("user2", &hash2).await.unwrap();

    let hash = users.find_by_username("user1").await.unwrap().unwrap().password_hash;
    assert!(auth_service.verify_password("Password1!", &hash).unwrap());
    assert!(!auth_service.verify_password("Password2!", &hash).unwrap());

    let hash = users.find_by_username("user2").await.unwrap().unwrap().password_hash;
    assert!(auth_service.verify_password("Password2!", &hash).unwrap());
    assert!(!auth_service.verify_password("Password1!", &hash).unwrap());
}
