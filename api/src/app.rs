//! Application factory
//!
//! Builds the Actix-web application from injected services, wiring routes,
//! CORS, request logging and the authentication middleware.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{middleware::Logger, web, App, HttpResponse};

use crate::dto::ErrorResponse;
use crate::middleware::auth::{AccessTokenVerifier, JwtAuth};
use crate::middleware::cors::create_cors;
use crate::routes::auth::{
    login::login, logout::logout, profile::profile, refresh::refresh, register::register,
    AppState,
};

use es_core::repositories::{TokenRepository, UserRepository};

/// Create and configure the application with all dependencies
pub fn create_app<U, T>(
    app_state: web::Data<AppState<U, T>>,
    verifier: Arc<dyn AccessTokenVerifier>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let cors = create_cors();

    App::new()
        // Shared services
        .app_data(app_state)
        .app_data(web::Data::new(verifier))
        // Middleware (order matters: CORS before logging)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/register", web::post().to(register::<U, T>))
                    .route("/login", web::post().to(login::<U, T>))
                    .route("/refresh", web::post().to(refresh::<U, T>))
                    .route("/logout", web::post().to(logout::<U, T>))
                    .route("/me", web::get().to(profile).wrap(JwtAuth::new())),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "envshare-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback handler for unknown routes
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("not_found", "Resource not found"))
}
