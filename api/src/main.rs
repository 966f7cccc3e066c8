use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::{info, warn};

use es_api::app::create_app;
use es_api::middleware::auth::AccessTokenVerifier;
use es_api::routes::auth::AppState;
use es_core::services::auth::AuthService;
use es_core::services::token::TokenService;
use es_infra::database::{create_pool, mysql::{MySqlTokenRepository, MySqlUserRepository}};
use es_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting EnvShare API server");

    // Load configuration
    let config = AppConfig::from_env();
    if config.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; using the development default. Do not run this in production.");
    }

    // Database pool and repositories
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to connect to database");

    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));
    let token_repository = MySqlTokenRepository::new(pool);

    // Services, wired together with explicit dependency injection
    let token_service = Arc::new(TokenService::new(token_repository, config.jwt.clone().into()));
    let verifier: Arc<dyn AccessTokenVerifier> = token_service.clone();
    let auth_service = Arc::new(AuthService::new(user_repository, token_service));

    let app_state = web::Data::new(AppState {
        auth_service,
    });

    let bind_address = config.server.bind_address();
    info!("Server listening on {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone(), verifier.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
