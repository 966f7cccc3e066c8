use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use es_core::repositories::{TokenRepository, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Authenticates a user and returns a fresh token pair. Earlier sessions
/// remain valid.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "a@x.com",
///     "password": "password123"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Same shape as register.
///
/// ## Errors
/// - 401 Unauthorized: unknown email or wrong password (indistinguishable)
/// - 400 Bad Request: malformed body
pub async fn login<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.login(&request.email, &request.password).await {
        Ok(response) => HttpResponse::Ok().json(AuthResponse::from(response)),
        Err(error) => handle_domain_error(&error),
    }
}
