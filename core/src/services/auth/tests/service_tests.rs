//! Unit tests for the authentication service
//!
//! Exercises the full lifecycle against the in-memory repositories:
//! registration, login, rotation (including the concurrent double-submit
//! race), logout idempotency, and access token verification.

use std::sync::Arc;

use crate::errors::{AuthError, DomainError, TokenError, ValidationError};
use crate::repositories::token::MockTokenRepository;
use crate::repositories::user::MockUserRepository;
use crate::services::auth::AuthService;
use crate::services::token::{TokenService, TokenServiceConfig};

type TestService = AuthService<MockUserRepository, MockTokenRepository>;

fn create_test_service() -> Arc<TestService> {
    create_test_service_with_config(TokenServiceConfig::default())
}

fn create_test_service_with_config(config: TokenServiceConfig) -> Arc<TestService> {
    let user_repository = Arc::new(MockUserRepository::new());
    let token_service = Arc::new(TokenService::new(MockTokenRepository::new(), config));
    Arc::new(AuthService::new(user_repository, token_service))
}

#[tokio::test]
async fn test_register_returns_verifiable_access_token() {
    let service = create_test_service();

    let response = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    assert_eq!(response.user.email, "a@x.com");
    assert!(!response.refresh_token.is_empty());

    // The issued access token verifies and decodes back to the same identity
    let claims = service.verify_access(&response.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), response.user.id);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.username, response.user.username);
}

#[tokio::test]
async fn test_register_generates_username_when_omitted() {
    let service = create_test_service();

    let response = service
        .register("alice@example.com", "password123", None)
        .await
        .unwrap();

    assert!(response.user.username.starts_with("user_alice_"));
}

#[tokio::test]
async fn test_register_keeps_supplied_username() {
    let service = create_test_service();

    let response = service
        .register("alice@example.com", "password123", Some("alice"))
        .await
        .unwrap();

    assert_eq!(response.user.username, "alice");
}

#[tokio::test]
async fn test_register_duplicate_email_fails() {
    let service = create_test_service();
    service
        .register("a@x.com", "password123", Some("first"))
        .await
        .unwrap();

    // Same email always fails, regardless of the username offered
    let result = service.register("a@x.com", "password123", Some("second")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));

    let result = service.register("a@x.com", "password123", None).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
}

#[tokio::test]
async fn test_register_duplicate_username_fails() {
    let service = create_test_service();
    service
        .register("a@x.com", "password123", Some("alice"))
        .await
        .unwrap();

    let result = service.register("b@x.com", "password123", Some("alice")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
}

#[tokio::test]
async fn test_register_validation_errors() {
    let service = create_test_service();

    let bad_email = service.register("not-an-email", "password123", None).await;
    assert!(matches!(
        bad_email,
        Err(DomainError::ValidationErr(ValidationError::InvalidEmail))
    ));

    let short_password = service.register("a@x.com", "short", None).await;
    assert!(matches!(
        short_password,
        Err(DomainError::ValidationErr(ValidationError::InvalidLength {
            field: "password",
            ..
        }))
    ));

    let short_username = service.register("a@x.com", "password123", Some("ab")).await;
    assert!(matches!(
        short_username,
        Err(DomainError::ValidationErr(ValidationError::InvalidLength {
            field: "username",
            ..
        }))
    ));
}

#[tokio::test]
async fn test_login_success() {
    let service = create_test_service();
    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    let response = service.login("a@x.com", "password123").await.unwrap();

    assert_eq!(response.user.id, registered.user.id);
    let claims = service.verify_access(&response.access_token).unwrap();
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let service = create_test_service();
    service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    let wrong_password = service.login("a@x.com", "password124").await.unwrap_err();
    let unknown_email = service.login("b@x.com", "password123").await.unwrap_err();

    // Same variant and same rendered message for both causes
    assert!(matches!(
        wrong_password,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        unknown_email,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_login_allows_concurrent_sessions() {
    let service = create_test_service();
    service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    let first = service.login("a@x.com", "password123").await.unwrap();
    let second = service.login("a@x.com", "password123").await.unwrap();

    // A second login does not revoke the first session's refresh token
    service.refresh_token(&first.refresh_token).await.unwrap();
    service.refresh_token(&second.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_and_invalidates_old_token() {
    let service = create_test_service();
    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    let rotated = service.refresh_token(&registered.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, registered.refresh_token);

    // The new access token still verifies to the same identity
    let claims = service.verify_access(&rotated.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), registered.user.id);

    // The consumed token is single-use
    let replay = service.refresh_token(&registered.refresh_token).await;
    assert!(matches!(
        replay,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_concurrent_refresh_has_single_winner() {
    let service = create_test_service();
    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let token = registered.refresh_token.clone();
        handles.push(tokio::spawn(async move {
            service.refresh_token(&token).await
        }));
    }

    let mut successes = 0;
    let mut invalid = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::Token(TokenError::InvalidRefreshToken)) => invalid += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(invalid, 7);
}

#[tokio::test]
async fn test_refresh_unknown_token_fails() {
    let service = create_test_service();

    let result = service.refresh_token("never-issued").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_logout_revokes_and_is_idempotent() {
    let service = create_test_service();
    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    service.logout(&registered.refresh_token).await.unwrap();

    // Refresh with the revoked token fails
    let result = service.refresh_token(&registered.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));

    // Logging out again, or with a token that never existed, still succeeds
    service.logout(&registered.refresh_token).await.unwrap();
    service.logout("never-issued").await.unwrap();
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let service = create_test_service();
    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();
    let second = service.login("a@x.com", "password123").await.unwrap();

    let revoked = service.logout_all(registered.user.id).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [registered.refresh_token, second.refresh_token] {
        let result = service.refresh_token(&token).await;
        assert!(matches!(
            result,
            Err(DomainError::Token(TokenError::InvalidRefreshToken))
        ));
    }
}

#[tokio::test]
async fn test_expired_access_token_fails_verification() {
    // Issue tokens that are already past expiry (beyond decode leeway)
    let config = TokenServiceConfig {
        access_token_expiry_minutes: -5,
        ..Default::default()
    };
    let service = create_test_service_with_config(config);

    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();

    let result = service.verify_access(&registered.access_token);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
}

#[tokio::test]
async fn test_full_lifecycle_scenario() {
    let service = create_test_service();

    // register -> tokens present, identity echoed back
    let registered = service
        .register("a@x.com", "password123", None)
        .await
        .unwrap();
    assert_eq!(registered.user.email, "a@x.com");

    // immediate refresh -> new pair, old refresh token now invalid
    let rotated = service.refresh_token(&registered.refresh_token).await.unwrap();
    assert!(matches!(
        service.refresh_token(&registered.refresh_token).await,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));

    // logout with the new refresh token -> success
    service.logout(&rotated.refresh_token).await.unwrap();

    // refresh with the revoked token -> invalid
    assert!(matches!(
        service.refresh_token(&rotated.refresh_token).await,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}
