//! # Examhall DB
//!
//! Postgres pool construction and the [`AccountStore`] persistence seam.
//!
//! [`PgAccountStore`] is the production implementation. With the `memory`
//! feature, [`MemoryAccountStore`] offers the same contract without a database.

mod error;
#[cfg(feature = "memory")]
mod memory;
mod postgres;
mod store;

use std::env;

use sqlx::postgres::PgPoolOptions;

pub use error::{StoreError, StoreResult};
#[cfg(feature = "memory")]
pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;
pub use store::AccountStore;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Initializes a PostgreSQL connection pool.
///
/// Reads `DATABASE_URL` and, optionally, `DATABASE_MAX_CONNECTIONS`
/// (default 10). Call once at startup and hand the pool to `AppState`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the database is unreachable.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> StoreResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
