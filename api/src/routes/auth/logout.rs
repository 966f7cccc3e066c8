use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{LogoutRequest, LogoutResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use es_core::repositories::{TokenRepository, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token. Idempotent: logging out with an
/// unknown or already-revoked token still reports success. Access tokens
/// already issued stay valid until their natural expiry.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "2f8a..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed body only
pub async fn logout<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
