use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, RegisterRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use es_core::repositories::{TokenRepository, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Registers a new user and returns their first token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "a@x.com",
///     "password": "password123",
///     "username": "alice"
/// }
/// ```
///
/// `username` is optional; one is derived from the email when omitted.
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "2f8a...",
///     "user": { "id": "...", "username": "alice", "email": "a@x.com" }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: validation failure (with field detail) or duplicate user
/// - 500 Internal Server Error: token generation or store failure
pub async fn register<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let result = state
        .auth_service
        .register(
            &request.email,
            &request.password,
            request.username.as_deref(),
        )
        .await;

    match result {
        Ok(response) => HttpResponse::Created().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(&error),
    }
}
