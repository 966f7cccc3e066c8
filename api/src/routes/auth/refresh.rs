use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::auth::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::{handle_domain_error, validation_error_response};

use es_core::repositories::{TokenRepository, UserRepository};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented token is
/// consumed: it can be used at most once, and a concurrent double-submit
/// yields exactly one success.
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
///     "access_token": "eyJ...",
///     "refresh_token": "9c41..."
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: token absent, revoked or expired (indistinguishable)
/// - 400 Bad Request: malformed body
pub async fn refresh<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.refresh_token(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
