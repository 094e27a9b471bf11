// SQLite MessageRepository Implementation

use crate::map_sqlx_error;
use async_trait::async_trait;
use dbq_core::domain::{MessageId, MessageStatus, QueueId, StoredMessage};
use dbq_core::error::Result;
use dbq_core::port::MessageRepository;
use sqlx::SqlitePool;

pub struct SqliteMessageRepository {
    pool: SqlitePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepository {
    async fn insert(&self, queue_id: QueueId, content: &str, now: i64) -> Result<MessageId> {
        let result = sqlx::query(
            r#"
            INSERT INTO messages (queue_id, creation_time, update_time, status, token, content)
            VALUES (?, ?, ?, ?, '', ?)
            "#,
        )
        .bind(queue_id)
        .bind(now)
        .bind(now)
        .bind(MessageStatus::Pending.as_str())
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_pending(&self, queue_id: QueueId, limit: u32) -> Result<Vec<StoredMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, queue_id, creation_time, update_time, status, token, content
            FROM messages
            WHERE queue_id = ? AND status = ?
            ORDER BY id ASC
            LIMIT ?
            "#,
        )
        .bind(queue_id)
        .bind(MessageStatus::Pending.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MessageRow::into_stored).collect()
    }

    async fn claim_pending(
        &self,
        queue_id: QueueId,
        token: &str,
        limit: u32,
        now: i64,
    ) -> Result<u64> {
        // Single statement: SQLite holds the write lock for its whole
        // duration, so no concurrent claim can observe the same pending rows.
        // The outer status check keeps the update conditional even if the
        // subquery were ever evaluated against a stale snapshot.
        let state_pending = MessageStatus::Pending.as_str();
        let state_processing = MessageStatus::Processing.as_str();

        let result = sqlx::query(
            r#"
            UPDATE messages
            SET token = ?, status = ?, update_time = ?
            WHERE id IN (
                SELECT id FROM messages
                WHERE queue_id = ? AND status = ?
                ORDER BY id ASC
                LIMIT ?
            )
              AND status = ?
            "#,
        )
        .bind(token)
        .bind(state_processing)
        .bind(now)
        .bind(queue_id)
        .bind(state_pending)
        .bind(i64::from(limit))
        .bind(state_pending)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn find_by_token(&self, queue_id: QueueId, token: &str) -> Result<Vec<StoredMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, queue_id, creation_time, update_time, status, token, content
            FROM messages
            WHERE queue_id = ? AND token = ?
            ORDER BY id ASC
            "#,
        )
        .bind(queue_id)
        .bind(token)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MessageRow::into_stored).collect()
    }

    async fn take_by_token(&self, queue_id: QueueId, token: &str) -> Result<Vec<StoredMessage>> {
        let mut rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            DELETE FROM messages
            WHERE queue_id = ? AND token = ?
            RETURNING id, queue_id, creation_time, update_time, status, token, content
            "#,
        )
        .bind(queue_id)
        .bind(token)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // RETURNING order is unspecified in SQLite
        rows.sort_by_key(|row| row.id);
        rows.into_iter().map(MessageRow::into_stored).collect()
    }

    async fn delete(&self, queue_id: QueueId, id: MessageId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ? AND queue_id = ?")
            .bind(id)
            .bind(queue_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn release_stale(&self, queue_id: QueueId, cutoff: i64, now: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = ?, token = '', update_time = ?
            WHERE queue_id = ? AND status = ? AND update_time < ?
            "#,
        )
        .bind(MessageStatus::Pending.as_str())
        .bind(now)
        .bind(queue_id)
        .bind(MessageStatus::Processing.as_str())
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn count_by_status(&self, queue_id: QueueId, status: MessageStatus) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE queue_id = ? AND status = ?")
                .bind(queue_id)
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    queue_id: i64,
    creation_time: i64,
    update_time: i64,
    status: String,
    token: String,
    content: String,
}

impl MessageRow {
    fn into_stored(self) -> Result<StoredMessage> {
        let status: MessageStatus = self.status.parse()?;

        Ok(StoredMessage {
            id: self.id,
            queue_id: self.queue_id,
            creation_time: self.creation_time,
            update_time: self.update_time,
            status,
            token: self.token,
            content: self.content,
        })
    }
}
