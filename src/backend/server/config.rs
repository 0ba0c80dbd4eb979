/**
 * Database Configuration
 *
 * Connects the PostgreSQL pool named by `AppConfig::database_url` and runs
 * the embedded migrations. The database is optional: a missing URL or a
 * failed connection returns `None`, and the server carries on with the
 * in-memory stores and without auth endpoints.
 */

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::shared::config::AppConfig;

/// Idle connections are dropped after this long
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

pub type DatabaseConfig = Option<PgPool>;

/// Connect to the configured database, if any, and run migrations
pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using in-memory stores; auth endpoints disabled.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(POOL_IDLE_TIMEOUT)
        .connect(database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            tracing::warn!("Database features will be disabled.");
            return None;
        }
    };

    tracing::info!(max_connections = config.db_max_connections, "Database connection pool created");

    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
