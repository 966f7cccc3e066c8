//! Database connection management and repository implementations

pub mod mysql;

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use es_shared::config::DatabaseConfig;

/// Create a MySQL connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<MySqlPool, sqlx::Error> {
    tracing::info!(max_connections = config.max_connections, "connecting to database");

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout))
        .connect(&config.url)
        .await
}
