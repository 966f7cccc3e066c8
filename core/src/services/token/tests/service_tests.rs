//! Unit tests for the token service

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, REFRESH_TOKEN_EXPIRY_DAYS};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::token::MockTokenRepository;
use crate::repositories::TokenRepository;
use crate::services::token::{TokenService, TokenServiceConfig};

fn create_test_service() -> TokenService<MockTokenRepository> {
    TokenService::new(MockTokenRepository::new(), TokenServiceConfig::default())
}

fn test_user() -> User {
    User::new("alice", "alice@example.com", "hash")
}

#[tokio::test]
async fn test_generate_tokens() {
    let service = create_test_service();
    let user = test_user();

    let pair = service.generate_tokens(&user).await.unwrap();

    assert!(!pair.access_token.is_empty());
    // 40 random bytes, hex encoded
    assert_eq!(pair.refresh_token.len(), 80);
    assert!(pair.refresh_token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_access_token_round_trip() {
    let service = create_test_service();
    let user = test_user();

    let pair = service.generate_tokens(&user).await.unwrap();
    let claims = service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.email, "alice@example.com");
}

#[tokio::test]
async fn test_refresh_tokens_are_unique() {
    let service = create_test_service();
    let user = test_user();

    let first = service.generate_tokens(&user).await.unwrap();
    let second = service.generate_tokens(&user).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
}

#[test]
fn test_expired_access_token_rejected() {
    let repository = MockTokenRepository::new();
    let config = TokenServiceConfig::default();
    let secret = config.jwt_secret.clone();
    let service = TokenService::new(repository, config);

    // Sign a token whose expiry is well past the default decode leeway,
    // with an otherwise valid signature
    let mut claims = Claims::new_access_token(Uuid::new_v4(), "alice", "a@x.com", 15);
    claims.exp = claims.iat - 600;
    claims.nbf = claims.iat - 900;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    let result = service.verify_access_token(&token);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::TokenExpired))
    ));
}

#[tokio::test]
async fn test_tampered_access_token_rejected() {
    let service = create_test_service();
    let user = test_user();

    let pair = service.generate_tokens(&user).await.unwrap();
    let mut tampered = pair.access_token.clone();
    tampered.pop();
    tampered.push('x');

    let result = service.verify_access_token(&tampered);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let service = create_test_service();

    let claims = Claims::new_access_token(Uuid::new_v4(), "alice", "a@x.com", 15);
    let foreign = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let result = service.verify_access_token(&foreign);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[tokio::test]
async fn test_garbage_access_token_rejected() {
    let service = create_test_service();

    let result = service.verify_access_token("definitely.not.a-jwt");
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[tokio::test]
async fn test_claim_refresh_token_single_use() {
    let service = create_test_service();
    let user = test_user();

    let pair = service.generate_tokens(&user).await.unwrap();

    let claimed = service.claim_refresh_token(&pair.refresh_token).await.unwrap();
    assert_eq!(claimed.user_id, user.id);

    // The same value can never be claimed again
    let again = service.claim_refresh_token(&pair.refresh_token).await;
    assert!(matches!(
        again,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_claim_unknown_refresh_token() {
    let service = create_test_service();

    let result = service.claim_refresh_token("unknown-value").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_revoke_refresh_token() {
    let service = create_test_service();
    let user = test_user();

    let pair = service.generate_tokens(&user).await.unwrap();

    assert!(service.revoke_refresh_token(&pair.refresh_token).await.unwrap());
    assert!(!service.revoke_refresh_token(&pair.refresh_token).await.unwrap());

    let result = service.claim_refresh_token(&pair.refresh_token).await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_cleanup_expired_tokens() {
    let repository = MockTokenRepository::new();
    let service = TokenService::new(repository.clone(), TokenServiceConfig::default());
    let user = test_user();

    let live = service.generate_tokens(&user).await.unwrap();

    let mut stale = RefreshToken::new(user.id, "stale-token", REFRESH_TOKEN_EXPIRY_DAYS);
    stale.expires_at = Utc::now() - Duration::days(1);
    repository.save_refresh_token(stale).await.unwrap();

    let deleted = service.cleanup_expired_tokens().await.unwrap();
    assert_eq!(deleted, 1);

    // The live token survives the sweep
    assert!(repository
        .find_refresh_token(&live.refresh_token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_revoke_all_user_tokens() {
    let repository = MockTokenRepository::new();
    let service = TokenService::new(repository.clone(), TokenServiceConfig::default());
    let user = test_user();

    let first = service.generate_tokens(&user).await.unwrap();
    let second = service.generate_tokens(&user).await.unwrap();

    let revoked = service.revoke_all_user_tokens(user.id).await.unwrap();
    assert_eq!(revoked, 2);

    for value in [first.refresh_token, second.refresh_token] {
        let record = repository.find_refresh_token(&value).await.unwrap().unwrap();
        assert!(record.is_revoked);
    }
}
