//! Authentication route handlers
//!
//! This module contains all authentication endpoints:
//! - User registration and login
//! - Token refresh (rotation)
//! - Logout
//! - Authenticated profile lookup

pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod register;

use std::sync::Arc;

use es_core::repositories::{TokenRepository, UserRepository};
use es_core::services::auth::AuthService;

/// Application state that holds the shared authentication service
pub struct AppState<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub auth_service: Arc<AuthService<U, T>>,
}
