//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for refresh token persistence operations
///
/// The opaque token value is the lookup key; uniqueness is enforced by the
/// store's key constraint. Revocation never deletes a record: revoked rows
/// are retained so that presenting one again can be recognized as reuse.
///
/// # Concurrency
/// `claim_refresh_token` is the linchpin of rotation: it must be
/// linearizable per token key, so that of N concurrent claims on the same
/// value exactly one observes the token as usable.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved token
    /// * `Err(DomainError)` - Save failed (e.g. duplicate token value)
    async fn save_refresh_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its opaque value (exact match)
    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Atomically claim and revoke a usable token
    ///
    /// If the token exists, is not revoked, and has not expired, its revoked
    /// flag is set and the claimed record is returned. Any other state
    /// (absent, already revoked, expired) yields `Ok(None)`; callers must
    /// not be able to tell these apart.
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - This caller won the claim
    /// * `Ok(None)` - Token was not usable
    /// * `Err(DomainError)` - Database error occurred
    async fn claim_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Revoke a specific refresh token
    ///
    /// Idempotent from the caller's perspective: revoking an absent or
    /// already-revoked token is not an error.
    ///
    /// # Returns
    /// * `Ok(true)` - An active token was revoked
    /// * `Ok(false)` - Token absent or already revoked
    async fn revoke_token(&self, token: &str) -> Result<bool, DomainError>;

    /// Revoke all active refresh tokens for a user
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens revoked
    async fn revoke_all_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Delete expired refresh tokens (periodic maintenance)
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of expired tokens deleted
    async fn delete_expired_tokens(&self) -> Result<usize, DomainError>;
}
