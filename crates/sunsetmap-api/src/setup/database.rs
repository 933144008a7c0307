use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use sunsetmap_core::Config;

/// Connects the pool and applies pending migrations.
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready"
    );
    Ok(pool)
}
