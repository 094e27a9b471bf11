// SQLite Connection Pool Setup

use crate::map_sqlx_error;
use dbq_core::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Pool tuning knobs
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,

    /// How long a writer waits on a locked database before failing
    pub busy_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Create SQLite connection pool with WAL mode and default settings
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    create_pool_with(database_url, &PoolConfig::default()).await
}

/// Create SQLite connection pool with explicit settings
///
/// Concurrent claimers rely on `busy_timeout`: writers queue on the database
/// lock instead of failing with SQLITE_BUSY.
pub async fn create_pool_with(database_url: &str, config: &PoolConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(map_sqlx_error)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.busy_timeout)
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        database_url = %database_url,
        max_connections = config.max_connections,
        "SQLite pool created"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_unopenable_path_is_database_error() {
        let err = create_pool("sqlite:/nonexistent-dbq-dir/queue.db")
            .await
            .unwrap_err();
        assert!(matches!(err, dbq_core::AppError::Database(_)));
    }
}
