//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair, JWT_ISSUER, REFRESH_TOKEN_BYTES};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Service for managing JWT access tokens and opaque refresh tokens
pub struct TokenService<R: TokenRepository> {
    repository: R,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token repository for persistence
    /// * `config` - Token service configuration
    pub fn new(repository: R, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generates a new token pair (access + refresh) for a user
    ///
    /// The access token is stateless and signed; the refresh token is an
    /// opaque random value persisted through the repository. Previously
    /// issued tokens are left untouched, so a user may hold several
    /// concurrent sessions.
    pub async fn generate_tokens(&self, user: &User) -> DomainResult<TokenPair> {
        let access_token = self.generate_access_token(user)?;
        let refresh_token = self.issue_refresh_token(user.id).await?;

        Ok(TokenPair::new(access_token, refresh_token))
    }

    /// Generates a signed access token carrying the user's identity claims
    fn generate_access_token(&self, user: &User) -> DomainResult<String> {
        let claims = Claims::new_access_token(
            user.id,
            &user.username,
            &user.email,
            self.config.access_token_expiry_minutes,
        );
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Generates an opaque refresh token and persists it
    async fn issue_refresh_token(&self, user_id: Uuid) -> DomainResult<String> {
        let value = generate_opaque_value();
        let record = RefreshToken::new(user_id, &value, self.config.refresh_token_expiry_days);

        self.repository
            .save_refresh_token(record)
            .await
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(value)
    }

    /// Verifies an access token and returns the claims
    ///
    /// Verification is pure and synchronous: signature, issuer and expiry
    /// checks only, no repository access.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError)` - Token is invalid, expired, or malformed
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::TokenExpired)
                } else {
                    DomainError::Token(TokenError::InvalidTokenFormat)
                }
            })?;

        Ok(token_data.claims)
    }

    /// Atomically claims a refresh token for rotation
    ///
    /// Exactly one of N concurrent claims on the same value succeeds; every
    /// failure cause (absent, revoked, expired) collapses into
    /// [`TokenError::InvalidRefreshToken`] so callers cannot distinguish
    /// them.
    pub async fn claim_refresh_token(&self, token: &str) -> DomainResult<RefreshToken> {
        self.repository
            .claim_refresh_token(token)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))
    }

    /// Revokes a specific refresh token
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - An active token was revoked
    /// * `Ok(false)` - Token absent or already revoked (not an error)
    pub async fn revoke_refresh_token(&self, token: &str) -> DomainResult<bool> {
        self.repository.revoke_token(token).await
    }

    /// Revokes all active refresh tokens for a user
    pub async fn revoke_all_user_tokens(&self, user_id: Uuid) -> DomainResult<usize> {
        self.repository.revoke_all_user_tokens(user_id).await
    }

    /// Removes expired refresh tokens from storage
    pub async fn cleanup_expired_tokens(&self) -> DomainResult<usize> {
        self.repository.delete_expired_tokens().await
    }
}

/// Generates an unguessable opaque token value: 40 bytes from the OS-seeded
/// CSPRNG, hex encoded (80 characters)
fn generate_opaque_value() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
