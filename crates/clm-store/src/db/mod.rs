//! # Database Persistence Layer
//!
//! Postgres persistence for blueprints, fields, contracts, and field values
//! via SQLx.
//!
//! The database layer is **optional**. When a database URL is configured,
//! every repository write goes to Postgres first and the in-memory stores
//! are hydrated from it at startup. Without one, the repository runs in
//! in-memory-only mode (development and tests).
//!
//! Lifecycle rules are enforced in `clm-state`, not in SQL. The schema only
//! carries the structural constraints (value sets, uniqueness, cascades).

pub mod blueprints;
pub mod contracts;
pub mod field_values;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the connection pool and run migrations.
///
/// Returns `None` when no URL is given (in-memory-only mode) and `Err` if
/// the URL is set but the connection or migration fails.
pub async fn init_pool(database_url: Option<&str>) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = database_url else {
        tracing::warn!(
            "DATABASE_URL not set; running in-memory only mode. \
             State will not survive restarts."
        );
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Map a malformed stored enum value to a decode error.
pub(crate) fn decode_err(column: &str, e: clm_core::ValidationError) -> sqlx::Error {
    tracing::error!(column, error = %e, "unreadable value in database");
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    }
}
