//! PostgreSQL persistence layer for the enrollment platform.
//!
//! Exposes connection pool helpers plus [`models`] (row structs and create
//! DTOs) and [`repositories`] (zero-sized structs whose methods accept any
//! sqlx executor, so they compose into a caller-managed transaction).

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Default connection pool size.
const MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Create a pool from the `DATABASE_URL` environment variable, loading a
/// `.env` file first if one is present.
pub async fn create_pool_from_env() -> Result<DbPool, sqlx::Error> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;
    create_pool(&url).await
}

/// Cheap connectivity probe for readiness checks.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
