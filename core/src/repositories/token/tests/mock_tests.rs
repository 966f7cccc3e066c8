//! Unit tests for the mock token repository, including the claim contract

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{RefreshToken, REFRESH_TOKEN_EXPIRY_DAYS};
use crate::errors::DomainError;
use crate::repositories::token::{MockTokenRepository, TokenRepository};

fn new_token(user_id: Uuid, value: &str) -> RefreshToken {
    RefreshToken::new(user_id, value, REFRESH_TOKEN_EXPIRY_DAYS)
}

#[tokio::test]
async fn test_save_and_find() {
    let repo = MockTokenRepository::new();
    let token = new_token(Uuid::new_v4(), "abc123");

    let saved = repo.save_refresh_token(token.clone()).await.unwrap();
    assert_eq!(saved, token);

    let found = repo.find_refresh_token("abc123").await.unwrap();
    assert_eq!(found, Some(token));

    let missing = repo.find_refresh_token("nope").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_value_rejected() {
    let repo = MockTokenRepository::new();
    repo.save_refresh_token(new_token(Uuid::new_v4(), "abc123"))
        .await
        .unwrap();

    let result = repo
        .save_refresh_token(new_token(Uuid::new_v4(), "abc123"))
        .await;

    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_claim_succeeds_exactly_once() {
    let repo = MockTokenRepository::new();
    repo.save_refresh_token(new_token(Uuid::new_v4(), "abc123"))
        .await
        .unwrap();

    let first = repo.claim_refresh_token("abc123").await.unwrap();
    assert!(first.is_some());
    assert!(first.unwrap().is_revoked);

    let second = repo.claim_refresh_token("abc123").await.unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_claim_rejects_expired() {
    let repo = MockTokenRepository::new();
    let mut token = new_token(Uuid::new_v4(), "abc123");
    token.expires_at = Utc::now() - Duration::hours(1);
    repo.save_refresh_token(token).await.unwrap();

    let claimed = repo.claim_refresh_token("abc123").await.unwrap();
    assert!(claimed.is_none());
}

#[tokio::test]
async fn test_claim_rejects_absent() {
    let repo = MockTokenRepository::new();

    let claimed = repo.claim_refresh_token("ghost").await.unwrap();
    assert!(claimed.is_none());
}

#[tokio::test]
async fn test_concurrent_claims_have_single_winner() {
    let repo = MockTokenRepository::new();
    repo.save_refresh_token(new_token(Uuid::new_v4(), "contended"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.claim_refresh_token("contended").await.unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let repo = MockTokenRepository::new();
    repo.save_refresh_token(new_token(Uuid::new_v4(), "abc123"))
        .await
        .unwrap();

    assert!(repo.revoke_token("abc123").await.unwrap());
    // Second revocation and unknown values are no-ops, not errors
    assert!(!repo.revoke_token("abc123").await.unwrap());
    assert!(!repo.revoke_token("ghost").await.unwrap());
}

#[tokio::test]
async fn test_revoke_all_user_tokens() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();
    repo.save_refresh_token(new_token(user_id, "one")).await.unwrap();
    repo.save_refresh_token(new_token(user_id, "two")).await.unwrap();
    repo.save_refresh_token(new_token(Uuid::new_v4(), "other"))
        .await
        .unwrap();

    let revoked = repo.revoke_all_user_tokens(user_id).await.unwrap();
    assert_eq!(revoked, 2);

    // The other user's token is untouched
    let other = repo.find_refresh_token("other").await.unwrap().unwrap();
    assert!(!other.is_revoked);
}

#[tokio::test]
async fn test_delete_expired_tokens() {
    let repo = MockTokenRepository::new();
    let mut expired = new_token(Uuid::new_v4(), "old");
    expired.expires_at = Utc::now() - Duration::days(1);
    repo.save_refresh_token(expired).await.unwrap();
    repo.save_refresh_token(new_token(Uuid::new_v4(), "fresh"))
        .await
        .unwrap();

    let deleted = repo.delete_expired_tokens().await.unwrap();
    assert_eq!(deleted, 1);

    assert!(repo.find_refresh_token("old").await.unwrap().is_none());
    assert!(repo.find_refresh_token("fresh").await.unwrap().is_some());
}
