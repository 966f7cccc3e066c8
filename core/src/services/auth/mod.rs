//! Authentication service module
//!
//! The token lifecycle manager: credential verification, registration,
//! login, refresh rotation, and revocation.

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
