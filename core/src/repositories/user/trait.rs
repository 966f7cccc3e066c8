//! User repository trait defining the interface for user persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations handle the actual database operations while keeping the
/// abstraction boundary between domain and infrastructure layers. Email and
/// username uniqueness is ultimately enforced by the store's constraints;
/// `create` must surface a constraint violation as
/// [`AuthError::UserAlreadyExists`](crate::errors::AuthError::UserAlreadyExists).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The saved user
    /// * `Err(DomainError)` - Duplicate email/username or database error
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Find a user by exact email match
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user matching the email, or the username when one is given
    ///
    /// Used by registration to detect duplicates in a single read.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: Option<&str>,
    ) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}
