//! Shared setup for integration tests

#![allow(dead_code)]

use dbq_core::port::time_provider::SystemTimeProvider;
use dbq_core::port::token_provider::UuidTokenProvider;
use dbq_core::port::TimeProvider;
use dbq_core::QueueRegistry;
use dbq_infra_sqlite::{create_pool, run_migrations, SqliteMessageRepository, SqliteQueueRepository};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Clock the test can move forward
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(start)))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn registry_with_clock(pool: SqlitePool, clock: Arc<dyn TimeProvider>) -> QueueRegistry {
    QueueRegistry::new(
        Arc::new(SqliteQueueRepository::new(pool.clone())),
        Arc::new(SqliteMessageRepository::new(pool)),
        Arc::new(UuidTokenProvider),
        clock,
    )
}

pub fn registry(pool: SqlitePool) -> QueueRegistry {
    registry_with_clock(pool, Arc::new(SystemTimeProvider))
}

/// In-memory store with migrations applied
pub async fn memory_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// Temp-file database, removed on drop
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("dbq-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// First connection: creates the file and applies migrations
    pub async fn pool(&self) -> SqlitePool {
        let pool = self.connect().await;
        run_migrations(&pool).await.unwrap();
        pool
    }

    /// Additional independent pool (another "process") on the same file
    pub async fn connect(&self) -> SqlitePool {
        create_pool(&self.url()).await.unwrap()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = std::fs::remove_file(side);
        }
    }
}
