//! Main authentication service implementation

use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use es_shared::utils::validation::validators;

use crate::domain::entities::token::{Claims, TokenPair};
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::password;
use crate::services::token::TokenService;

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 100;
const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 50;

/// Authentication service orchestrating the token lifecycle
///
/// Owns no state of its own: every operation re-reads current records
/// through the injected collaborators, so a revocation done by one request
/// is immediately visible to all others.
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// User repository for account lookup and creation
    user_repository: Arc<U>,
    /// Token service for JWT and refresh token management
    token_service: Arc<TokenService<T>>,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user persistence
    /// * `token_service` - Service for token issuance and revocation
    pub fn new(user_repository: Arc<U>, token_service: Arc<TokenService<T>>) -> Self {
        Self {
            user_repository,
            token_service,
        }
    }

    /// Register a new user and issue their first token pair
    ///
    /// When no username is supplied one is derived from the email local
    /// part as `user_<local>_<0..9999>`. The random suffix makes collisions
    /// unlikely rather than impossible; an actual collision is caught by
    /// the store's unique constraint and surfaced as a duplicate.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - malformed email, password or username
    /// * `AuthError::UserAlreadyExists` - email or username already taken
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> DomainResult<AuthResponse> {
        validate_registration(email, password, username)?;

        // Duplicate check covers the username only when one was supplied
        if self
            .user_repository
            .find_by_email_or_username(email, username)
            .await?
            .is_some()
        {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        let username = match username {
            Some(name) => name.to_string(),
            None => generate_username(email),
        };

        // Offload bcrypt so other requests keep progressing
        let plain = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
            .await
            .map_err(|_| DomainError::Internal {
                message: "Password hashing task failed".to_string(),
            })??;

        let user = self
            .user_repository
            .create(User::new(username, email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "registered new user");

        let tokens = self.token_service.generate_tokens(&user).await?;
        Ok(AuthResponse::new(tokens, &user))
    }

    /// Authenticate a user and issue a fresh token pair
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint cannot be used to enumerate accounts. Prior refresh tokens
    /// are left valid: each login opens an independent session.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCredentials))?;

        let plain = password.to_string();
        let stored_hash = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored_hash))
                .await
                .map_err(|_| DomainError::Internal {
                    message: "Password verification task failed".to_string(),
                })?;

        if !verified {
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        tracing::info!(user_id = %user.id, "user logged in");

        let tokens = self.token_service.generate_tokens(&user).await?;
        Ok(AuthResponse::new(tokens, &user))
    }

    /// Exchange a refresh token for a new token pair (rotation)
    ///
    /// The presented token is claimed atomically before the new pair is
    /// issued: of N concurrent calls with the same value exactly one
    /// succeeds and the rest fail with `InvalidRefreshToken`. Absent,
    /// revoked and expired tokens fail identically.
    pub async fn refresh_token(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let claimed = self.token_service.claim_refresh_token(refresh_token).await?;

        // Re-read the owning user; a vanished account must look like any
        // other invalid token
        let user = self
            .user_repository
            .find_by_id(claimed.user_id)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        tracing::debug!(user_id = %user.id, "rotated refresh token");

        self.token_service.generate_tokens(&user).await
    }

    /// Log out by revoking the presented refresh token
    ///
    /// Idempotent: revoking an unknown or already-revoked token still
    /// reports success. Access tokens already issued stay valid until
    /// their natural expiry (no server-side access-token revocation);
    /// the exposure window is bounded by the access token ttl.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let revoked = self.token_service.revoke_refresh_token(refresh_token).await?;
        tracing::debug!(revoked, "logout processed");
        Ok(())
    }

    /// Log out everywhere: revoke every active refresh token of a user
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<usize> {
        let count = self.token_service.revoke_all_user_tokens(user_id).await?;
        tracing::info!(user_id = %user_id, count, "revoked all sessions");
        Ok(count)
    }

    /// Verify an access token and return its identity claims
    pub fn verify_access(&self, token: &str) -> DomainResult<Claims> {
        self.token_service.verify_access_token(token)
    }
}

/// Derive a username from the email local part, e.g. `user_alice_4821`
fn generate_username(email: &str) -> String {
    let local = email.split('@').next().unwrap_or("user");
    let suffix: u32 = rand::thread_rng().gen_range(0..10000);
    format!("user_{}_{}", local, suffix)
}

fn validate_registration(
    email: &str,
    password: &str,
    username: Option<&str>,
) -> DomainResult<()> {
    if !validators::is_valid_email(email) {
        return Err(DomainError::ValidationErr(ValidationError::InvalidEmail));
    }

    if !validators::length_between(password, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN) {
        return Err(DomainError::ValidationErr(ValidationError::InvalidLength {
            field: "password",
            min: PASSWORD_MIN_LEN,
            max: PASSWORD_MAX_LEN,
        }));
    }

    if let Some(name) = username {
        if !validators::length_between(name, USERNAME_MIN_LEN, USERNAME_MAX_LEN) {
            return Err(DomainError::ValidationErr(ValidationError::InvalidLength {
                field: "username",
                min: USERNAME_MIN_LEN,
                max: USERNAME_MAX_LEN,
            }));
        }
    }

    Ok(())
}
