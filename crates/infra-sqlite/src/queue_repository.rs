// SQLite QueueRepository Implementation

use crate::map_sqlx_error;
use async_trait::async_trait;
use dbq_core::domain::{QueueId, QueueName};
use dbq_core::error::Result;
use dbq_core::port::QueueRepository;
use sqlx::SqlitePool;

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn upsert(&self, name: &QueueName) -> Result<()> {
        // Existing row is left untouched so its id stays stable
        sqlx::query("INSERT INTO queues (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_id_by_name(&self, name: &QueueName) -> Result<Option<QueueId>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM queues WHERE name = ?")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(id)
    }
}
