//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository for testing
///
/// The claim operation runs entirely under one write lock, which gives the
/// same per-key linearizability as the conditional UPDATE used in MySQL.
#[derive(Clone)]
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        // Mirror the unique key constraint on the token value
        if tokens.contains_key(&token.token) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).cloned())
    }

    async fn claim_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token) {
            Some(record) if record.is_usable() => {
                record.revoke();
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn revoke_token(&self, token: &str) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token) {
            Some(record) if !record.is_revoked => {
                record.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for record in tokens.values_mut() {
            if record.user_id == user_id && !record.is_revoked {
                record.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, record| !record.is_expired());

        Ok(initial_count - tokens.len())
    }
}
