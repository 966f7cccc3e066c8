//! Domain-specific error types for authentication and token operations
//!
//! The authentication variants are deliberately coarse-grained: detailed
//! causes (unknown email vs. wrong password; absent vs. revoked vs. expired
//! refresh token) are collapsed before they reach a caller so that failures
//! cannot be used as an enumeration or revocation oracle. Validation errors
//! are the one category that carries field-level detail.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User with this email or username already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Token-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors, surfaced with field-level detail
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid length for field: {field} (min: {min}, max: {max})")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("Required field: {field}")]
    RequiredField { field: &'static str },
}

impl ValidationError {
    /// The field this error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail => "email",
            ValidationError::InvalidLength { field, .. } => field,
            ValidationError::RequiredField { field } => field,
        }
    }
}
