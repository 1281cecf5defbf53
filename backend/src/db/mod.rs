//! Database connection and pool management

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Pool tuning that is not exposed through configuration
pub struct PoolSettings {
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Create the PostgreSQL pool backing the session store
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let settings = PoolSettings::default();
    let connect_options =
        PgConnectOptions::from_str(&config.url)?.application_name("fitness-progress");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(settings.min_connections.min(config.max_connections))
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(max = config.max_connections, "Database pool created");

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Ping the database, returning the round-trip time
pub async fn health_check(pool: &PgPool) -> Result<Duration> {
    let started = Instant::now();
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| started.elapsed())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}
