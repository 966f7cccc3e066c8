//! JWT authentication middleware for protecting API endpoints.
//!
//! `JwtAuth` extracts the bearer token from the Authorization header,
//! verifies it through the injected [`AccessTokenVerifier`], and injects
//! an [`AuthContext`] into the request for downstream handlers. All
//! verification failures are rejected uniformly, without disclosing the
//! cause. `OptionalJwtAuth` never rejects: absent or invalid tokens simply
//! leave the identity context empty.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use es_core::domain::entities::token::Claims;
use es_core::errors::{DomainError, TokenError};
use es_core::repositories::TokenRepository;
use es_core::services::token::TokenService;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID extracted from JWT claims
    pub user_id: Uuid,
    /// Username claim
    pub username: String,
    /// Email claim
    pub email: String,
}

impl AuthContext {
    /// Creates a new authentication context from JWT claims
    pub fn from_claims(claims: Claims) -> Result<Self, DomainError> {
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidTokenFormat))?;
        Ok(Self {
            user_id,
            username: claims.username,
            email: claims.email,
        })
    }
}

/// Trait for access token verification, allowing dynamic dispatch from
/// middleware without naming the repository type parameter
pub trait AccessTokenVerifier: Send + Sync {
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError>;
}

impl<R: TokenRepository> AccessTokenVerifier for TokenService<R> {
    fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        TokenService::verify_access_token(self, token)
    }
}

/// JWT authentication middleware factory
///
/// Requires an `Arc<dyn AccessTokenVerifier>` registered as app data; the
/// verifier is injected at startup rather than read from the environment.
#[derive(Default)]
pub struct JwtAuth;

impl JwtAuth {
    /// Creates a new JWT authentication middleware
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Reject before touching the verifier when the carrier is absent
            // or malformed
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    return Err(ErrorUnauthorized("Missing or invalid Authorization header"));
                }
            };

            let auth_context = match verify_request_token(&req, &token) {
                Some(context) => context,
                // One uniform rejection for every verification failure
                None => return Err(ErrorUnauthorized("Unauthorized")),
            };

            // Inject auth context into request extensions
            req.extensions_mut().insert(auth_context);

            service.call(req).await
        })
    }
}

/// Optional authentication middleware factory
///
/// Verifies a bearer token when one is present and valid, but never rejects
/// the request; downstream handlers apply their own policy via
/// [`OptionalAuth`].
#[derive(Default)]
pub struct OptionalJwtAuth;

impl OptionalJwtAuth {
    /// Creates a new optional authentication middleware
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for OptionalJwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionalJwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OptionalJwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Optional authentication middleware service
pub struct OptionalJwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OptionalJwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if let Some(token) = extract_bearer_token(&req) {
                if let Some(context) = verify_request_token(&req, &token) {
                    req.extensions_mut().insert(context);
                }
            }

            service.call(req).await
        })
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Verifies a token against the app-data verifier, yielding the identity
/// context on success
fn verify_request_token(req: &ServiceRequest, token: &str) -> Option<AuthContext> {
    let verifier = req.app_data::<web::Data<Arc<dyn AccessTokenVerifier>>>()?;
    let claims = verifier.verify_access_token(token).ok()?;
    AuthContext::from_claims(claims).ok()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
