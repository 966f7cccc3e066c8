//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use es_core::domain::entities::user::User;
use es_core::errors::{AuthError, DomainError};
use es_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
///
/// Email and username uniqueness is enforced by unique indexes on the
/// `users` table; a constraint violation on insert surfaces as
/// `AuthError::UserAlreadyExists`.
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid user UUID: {}", e) })?,
            username: row
                .try_get("username")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get username: {}", e) })?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get email: {}", e) })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get password_hash: {}", e) })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get created_at: {}", e) })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get updated_at: {}", e) })?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, username, email, password_hash, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    DomainError::Auth(AuthError::UserAlreadyExists)
                }
                other => DomainError::Internal {
                    message: format!("Failed to create user: {}", other),
                },
            })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by email: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: Option<&str>,
    ) -> Result<Option<User>, DomainError> {
        let result = match username {
            Some(name) => {
                let query = r#"
                    SELECT id, username, email, password_hash, created_at, updated_at
                    FROM users
                    WHERE email = ? OR username = ?
                    LIMIT 1
                "#;
                sqlx::query(query)
                    .bind(email)
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                let query = r#"
                    SELECT id, username, email, password_hash, created_at, updated_at
                    FROM users
                    WHERE email = ?
                    LIMIT 1
                "#;
                sqlx::query(query).bind(email).fetch_optional(&self.pool).await
            }
        }
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to find user by email or username: {}", e),
        })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by id: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}
