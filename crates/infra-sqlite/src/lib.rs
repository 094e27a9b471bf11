// dbq Infrastructure - SQLite Adapter
// Implements: QueueRepository, MessageRepository

mod connection;
mod error;
mod message_repository;
mod migration;
mod queue_repository;

pub use connection::{create_pool, create_pool_with, PoolConfig};
pub use error::map_sqlx_error;
pub use message_repository::SqliteMessageRepository;
pub use migration::run_migrations;
pub use queue_repository::SqliteQueueRepository;

// Note: sqlx::Error conversion goes through map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
