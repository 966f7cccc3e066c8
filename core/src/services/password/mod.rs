//! Password hashing and verification.
//!
//! Thin wrapper over bcrypt with a fixed cost factor. Neither function logs
//! or returns plaintext or hash material beyond its contract.

use crate::errors::{DomainError, DomainResult};

/// bcrypt cost factor (2^10 rounds)
const HASH_COST: u32 = 10;

/// Hash a plaintext password with a per-call random salt
pub fn hash_password(plain: &str) -> DomainResult<String> {
    bcrypt::hash(plain, HASH_COST).map_err(|_| DomainError::Internal {
        message: "Password hashing failed".to_string(),
    })
}

/// Verify a plaintext password against a stored bcrypt hash
///
/// A malformed stored hash verifies as `false`, indistinguishable from a
/// wrong password.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plain, stored_hash).unwrap_or(false)
}
