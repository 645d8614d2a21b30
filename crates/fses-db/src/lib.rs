//! # FSES DB
//!
//! PostgreSQL pool initialisation and database error mapping.
//!
//! # Example
//!
//! ```ignore
//! use fses_db::{db_error, init_db_pool};
//!
//! let pool = init_db_pool().await;
//! sqlx::query("DELETE FROM departments WHERE id = $1")
//!     .bind(id)
//!     .execute(&pool)
//!     .await
//!     .map_err(db_error)?;
//! ```

use std::env;

use anyhow::anyhow;
use fses_core::AppError;
use sqlx::postgres::PgPoolOptions;
use tracing::error;

pub use sqlx::PgPool;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable. Called
/// once at startup, before the listener is bound.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Converts a [`sqlx::Error`] into an [`AppError`].
///
/// Constraint violations the caller can fix become field-level validation
/// errors keyed by the offending column; everything else is a 500.
pub fn db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        let field = db_err
            .constraint()
            .map(|c| field_from_constraint(db_err.table(), c))
            .unwrap_or_else(|| "non_field_errors".to_string());

        if db_err.is_foreign_key_violation() {
            return AppError::field(&field, "Referenced object does not exist.");
        }
        if db_err.is_unique_violation() {
            return AppError::field(&field, "An object with this value already exists.");
        }
        if db_err.is_check_violation() {
            return AppError::field(&field, "Value is not allowed.");
        }
    }

    error!(error = %err, "Database error");
    AppError::internal(anyhow!(err))
}

/// Derives a payload field name from a Postgres constraint name.
///
/// Default constraint names look like `{table}_{column}_fkey` / `_key` / `_check`;
/// the column is what the client sent. `_id` is dropped so `students_department_id_fkey`
/// maps to `department`, the name used in request bodies.
pub fn field_from_constraint(table: Option<&str>, constraint: &str) -> String {
    let mut name = constraint;
    if let Some(table) = table {
        name = name
            .strip_prefix(table)
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(name);
    }
    for suffix in ["_fkey", "_key", "_check"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
            break;
        }
    }
    name.strip_suffix("_id").unwrap_or(name).to_string()
}
