use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use tracing::{info, instrument};

use crate::shared::{AppError, DUPLICATE_EMAIL};

const MAX_CONNECTIONS: u32 = 5;

/// Opens the shared PostgreSQL connection pool
#[instrument(skip(database_url))]
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!(max_connections = MAX_CONNECTIONS, "Connected to database");
    Ok(pool)
}

/// Applies the embedded schema migrations from `migrations/`
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Maps a write failure on `employees` or `users` to `AppError`. The only
/// unique column those tables carry besides the key is `email`, so a unique
/// violation is the duplicate-email conflict.
pub fn map_write_error(error: sqlx::Error) -> AppError {
    let is_unique_violation = error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation());

    if is_unique_violation {
        AppError::Conflict(DUPLICATE_EMAIL.to_string())
    } else {
        AppError::DatabaseError(error.to_string())
    }
}
