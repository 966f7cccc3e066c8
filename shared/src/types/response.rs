//! API response types and wrappers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response body returned by the API
///
/// `error` is a stable machine-readable code; `message` is human-readable.
/// Validation failures additionally carry per-field detail in `details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "invalid_credentials")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Field-level validation details, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Vec<String>>>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attach field-level validation details
    pub fn with_details(mut self, details: HashMap<String, Vec<String>>) -> Self {
        self.details = Some(details);
        self
    }
}
