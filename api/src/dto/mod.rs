//! Request and response DTOs

pub mod auth;
pub mod error;

pub use error::{ErrorResponse, ErrorResponseExt};
