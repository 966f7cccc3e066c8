//! Domain error to HTTP response translation
//!
//! Every domain failure is a normal, recoverable outcome for one request;
//! nothing here escalates beyond a response. The coarse authentication
//! errors map onto single fixed messages so the API never discloses which
//! underlying cause (unknown email vs. wrong password, revoked vs. expired
//! token) produced the rejection. Validation errors are the one category
//! returned with per-field detail.

use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use es_core::errors::{AuthError, DomainError, TokenError, ValidationError};

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::UserAlreadyExists => HttpResponse::BadRequest().json(ErrorResponse::new(
                "duplicate_user",
                "User with this email or username already exists",
            )),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(
                ErrorResponse::new("invalid_credentials", "Invalid credentials"),
            ),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidRefreshToken => HttpResponse::Unauthorized().json(
                ErrorResponse::new("invalid_refresh_token", "Invalid refresh token"),
            ),
            // Any access-token failure is a bare 401 with no cause detail
            _ => HttpResponse::Unauthorized()
                .json(ErrorResponse::new("unauthorized", "Unauthorized")),
        },
        DomainError::ValidationErr(validation_error) => {
            validation_field_response(validation_error)
        }
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new("validation_error", message.clone())),
        DomainError::Unauthorized => {
            HttpResponse::Unauthorized().json(ErrorResponse::new("unauthorized", "Unauthorized"))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            format!("Resource not found: {}", resource),
        )),
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            ErrorResponse::new("internal_error", "An internal error occurred")
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Build a 400 response for a single typed validation error, keyed by field
fn validation_field_response(error: &ValidationError) -> HttpResponse {
    let mut details = HashMap::new();
    details.insert(error.field().to_string(), vec![error.to_string()]);

    HttpResponse::BadRequest().json(
        ErrorResponse::new("validation_error", "Validation failed").with_details(details),
    )
}

/// Build a 400 response from `validator` derive output, keyed by field
pub fn validation_error_response(errors: &validator::ValidationErrors) -> HttpResponse {
    let mut details: HashMap<String, Vec<String>> = HashMap::new();

    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), messages);
    }

    HttpResponse::BadRequest().json(
        ErrorResponse::new("validation_error", "Validation failed").with_details(details),
    )
}
