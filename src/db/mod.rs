//! Database access layer
//!
//! One SQLite pool for the whole service. Mutating requests take a single
//! transaction; reads go straight to the pool.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod artists;
pub mod schema;
pub mod shows;
pub mod venues;

/// Open (creating if needed) the database and bring the schema up.
///
/// Pragmas are set through the connect options so every pooled connection
/// carries them: referential integrity (venue deletion cascades to
/// shows), WAL for concurrent readers, busy timeout for write contention.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    schema::initialize_schema(&pool).await?;

    Ok(pool)
}

// In-memory databases exist per connection, so tests cap the pool at one
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create in-memory database");
    schema::initialize_schema(&pool)
        .await
        .expect("Schema initialization failed");
    pool
}
