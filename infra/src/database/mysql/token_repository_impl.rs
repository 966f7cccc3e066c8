//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh tokens live in the `refresh_tokens` table with a unique index on
//! the opaque `token` column. Rotation relies on `claim_refresh_token`,
//! implemented as a single conditional UPDATE: MySQL's per-row write
//! atomicity guarantees that of N concurrent claims on one token value
//! exactly one sees `rows_affected = 1`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use es_core::domain::entities::token::RefreshToken;
use es_core::errors::DomainError;
use es_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;

        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get user_id: {}", e) })?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid token UUID: {}", e) })?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid user UUID: {}", e) })?,
            token: row
                .try_get("token")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get token: {}", e) })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get created_at: {}", e) })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get expires_at: {}", e) })?,
            is_revoked: row
                .try_get("revoked")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get revoked: {}", e) })?,
        })
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token, created_at, expires_at, revoked
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.is_revoked)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    DomainError::Validation {
                        message: "Token already exists".to_string(),
                    }
                }
                other => DomainError::Internal {
                    message: format!("Failed to save refresh token: {}", other),
                },
            })?;

        Ok(token)
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token, created_at, expires_at, revoked
            FROM refresh_tokens
            WHERE token = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find refresh token: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn claim_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError> {
        // Conditional single-row update: only a usable token flips, and only
        // for one of any number of concurrent callers
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token = ? AND revoked = FALSE AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to claim refresh token: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Re-read the claimed record for the owning user reference
        self.find_refresh_token(token).await
    }

    async fn revoke_token(&self, token: &str) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke token: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE user_id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to revoke user tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let query = r#"
            DELETE FROM refresh_tokens
            WHERE expires_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete expired tokens: {}", e),
            })?;

        tracing::debug!(deleted = result.rows_affected(), "expired token sweep");

        Ok(result.rows_affected() as usize)
    }
}
