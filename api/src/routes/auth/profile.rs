use actix_web::HttpResponse;

use crate::dto::auth::ProfileResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me
///
/// Returns the identity claims of the authenticated caller. Protected by
/// the JWT middleware; the identity context is bound by the session guard
/// and read-only here.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "user_id": "...",
///     "username": "alice",
///     "email": "a@x.com"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing, malformed, expired or tampered token
pub async fn profile(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse {
        user_id: auth.user_id,
        username: auth.username,
        email: auth.email,
    })
}
