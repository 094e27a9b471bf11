// Queue Service - registry and bound handles

pub mod constants;
pub mod open;
pub mod reclaim;
pub mod remove;
pub mod retrieve;
pub mod send;

use crate::domain::{
    Message, MessageContent, MessageId, MessageStatus, QueueId, QueueName, QueueStats,
    RetrievalMode,
};
use crate::error::Result;
use crate::port::{MessageRepository, QueueRepository, TimeProvider, TokenProvider};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Resolves queue names into bound [`QueueHandle`]s
///
/// Holds no per-queue state: every `open` goes to the store, and each
/// handle owns its own references to the ports.
#[derive(Clone)]
pub struct QueueRegistry {
    queue_repo: Arc<dyn QueueRepository>,
    message_repo: Arc<dyn MessageRepository>,
    token_provider: Arc<dyn TokenProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueRegistry {
    pub fn new(
        queue_repo: Arc<dyn QueueRepository>,
        message_repo: Arc<dyn MessageRepository>,
        token_provider: Arc<dyn TokenProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            queue_repo,
            message_repo,
            token_provider,
            time_provider,
        }
    }

    /// Validate `name`, create the queue if needed, and bind a handle to it
    pub async fn open(&self, name: &str) -> Result<QueueHandle> {
        let name = QueueName::parse(name)?;
        let queue_id = open::execute(self.queue_repo.as_ref(), &name).await?;

        info!(queue = %name, queue_id = queue_id, "Queue opened");

        Ok(QueueHandle {
            queue_id,
            name,
            message_repo: Arc::clone(&self.message_repo),
            token_provider: Arc::clone(&self.token_provider),
            time_provider: Arc::clone(&self.time_provider),
        })
    }
}

/// A queue bound to one resolved id
///
/// Every operation is scoped to that id. Cloning is cheap and clones share
/// the underlying store.
#[derive(Clone)]
pub struct QueueHandle {
    queue_id: QueueId,
    name: QueueName,
    message_repo: Arc<dyn MessageRepository>,
    token_provider: Arc<dyn TokenProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for QueueHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueHandle")
            .field("queue_id", &self.queue_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl QueueHandle {
    pub fn id(&self) -> QueueId {
        self.queue_id
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    /// Enqueue a JSON value as a pending message
    pub async fn send(&self, content: serde_json::Value) -> Result<MessageId> {
        send::execute(
            self.message_repo.as_ref(),
            self.time_provider.as_ref(),
            self.queue_id,
            &MessageContent::new(content),
        )
        .await
    }

    /// Enqueue any serializable value
    pub async fn send_value<T: Serialize + ?Sized>(&self, content: &T) -> Result<MessageId> {
        let value = serde_json::to_value(content)?;
        self.send(value).await
    }

    /// Fetch up to `count` messages using `mode`
    ///
    /// Never blocks waiting for messages: an empty queue yields an empty vec.
    pub async fn get_messages(&self, count: u32, mode: RetrievalMode) -> Result<Vec<Message>> {
        retrieve::execute(
            self.message_repo.as_ref(),
            self.token_provider.as_ref(),
            self.time_provider.as_ref(),
            self.queue_id,
            count,
            mode,
        )
        .await
    }

    /// Claim a single message (worker mode)
    pub async fn get_message(&self) -> Result<Option<Message>> {
        let mut messages = self.get_messages(1, RetrievalMode::Worker).await?;
        Ok(messages.pop())
    }

    /// Delete a message by id; `Ok(false)` if it was not in this queue
    pub async fn remove(&self, id: MessageId) -> Result<bool> {
        remove::execute(self.message_repo.as_ref(), self.queue_id, id).await
    }

    /// Return claims older than `window` to pending
    pub async fn reclaim_stale(&self, window: Duration) -> Result<u64> {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        reclaim::execute(
            self.message_repo.as_ref(),
            self.time_provider.as_ref(),
            self.queue_id,
            window_ms,
        )
        .await
    }

    /// Message counts by status
    pub async fn stats(&self) -> Result<QueueStats> {
        let pending = self
            .message_repo
            .count_by_status(self.queue_id, MessageStatus::Pending)
            .await?;
        let processing = self
            .message_repo
            .count_by_status(self.queue_id, MessageStatus::Processing)
            .await?;

        Ok(QueueStats {
            pending,
            processing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::time_provider::SystemTimeProvider;
    use crate::port::token_provider::UuidTokenProvider;
    use crate::port::{MockMessageRepository, MockQueueRepository};

    fn registry(queue_repo: MockQueueRepository, message_repo: MockMessageRepository) -> QueueRegistry {
        QueueRegistry::new(
            Arc::new(queue_repo),
            Arc::new(message_repo),
            Arc::new(UuidTokenProvider),
            Arc::new(SystemTimeProvider),
        )
    }

    #[tokio::test]
    async fn test_invalid_name_never_reaches_store() {
        let registry = registry(MockQueueRepository::new(), MockMessageRepository::new());

        let err = registry.open("").await.unwrap_err();
        assert!(err.is_validation());

        let err = registry.open(&"q".repeat(26)).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_open_binds_resolved_id() {
        let mut queue_repo = MockQueueRepository::new();
        queue_repo.expect_upsert().returning(|_| Ok(()));
        queue_repo.expect_find_id_by_name().returning(|_| Ok(Some(8)));

        let handle = registry(queue_repo, MockMessageRepository::new())
            .open("jobs")
            .await
            .unwrap();

        assert_eq!(handle.id(), 8);
        assert_eq!(handle.name().as_str(), "jobs");
    }

    #[tokio::test]
    async fn test_operations_are_scoped_to_bound_id() {
        let mut queue_repo = MockQueueRepository::new();
        queue_repo.expect_upsert().returning(|_| Ok(()));
        queue_repo.expect_find_id_by_name().returning(|_| Ok(Some(8)));

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_insert()
            .withf(|queue_id, _, _| *queue_id == 8)
            .returning(|_, _, _| Ok(1));
        message_repo
            .expect_delete()
            .withf(|queue_id, id| *queue_id == 8 && *id == 1)
            .returning(|_, _| Ok(1));
        message_repo
            .expect_count_by_status()
            .withf(|queue_id, _| *queue_id == 8)
            .returning(|_, status| Ok(if status == MessageStatus::Pending { 4 } else { 1 }));

        let handle = registry(queue_repo, message_repo).open("jobs").await.unwrap();

        assert_eq!(handle.send(serde_json::json!({"a": 1})).await.unwrap(), 1);
        assert!(handle.remove(1).await.unwrap());

        let stats = handle.stats().await.unwrap();
        assert_eq!(stats.pending, 4);
        assert_eq!(stats.processing, 1);
        assert_eq!(stats.total(), 5);
    }

    #[tokio::test]
    async fn test_get_message_on_empty_queue_is_none() {
        let mut queue_repo = MockQueueRepository::new();
        queue_repo.expect_upsert().returning(|_| Ok(()));
        queue_repo.expect_find_id_by_name().returning(|_| Ok(Some(1)));

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_claim_pending()
            .withf(|_, _, limit, _| *limit == 1)
            .returning(|_, _, _, _| Ok(0));

        let handle = registry(queue_repo, message_repo).open("jobs").await.unwrap();
        assert!(handle.get_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_value_serializes_structs() {
        #[derive(Serialize)]
        struct Resize {
            task: &'static str,
            w: u32,
        }

        let mut queue_repo = MockQueueRepository::new();
        queue_repo.expect_upsert().returning(|_| Ok(()));
        queue_repo.expect_find_id_by_name().returning(|_| Ok(Some(1)));

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_insert()
            .withf(|_, content, _| content == r#"{"task":"resize","w":100}"#)
            .returning(|_, _, _| Ok(2));

        let handle = registry(queue_repo, message_repo).open("jobs").await.unwrap();
        let id = handle
            .send_value(&Resize {
                task: "resize",
                w: 100,
            })
            .await
            .unwrap();
        assert_eq!(id, 2);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_database_error() {
        let mut queue_repo = MockQueueRepository::new();
        queue_repo.expect_upsert().returning(|_| Ok(()));
        queue_repo.expect_find_id_by_name().returning(|_| Ok(Some(1)));

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_find_pending()
            .returning(|_, _| Err(AppError::Database("connection closed".to_string())));

        let handle = registry(queue_repo, message_repo).open("jobs").await.unwrap();
        let err = handle.get_messages(5, RetrievalMode::Reader).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
