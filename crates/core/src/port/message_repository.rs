// Message Repository Port (Interface)

use crate::domain::{MessageId, MessageStatus, QueueId, StoredMessage};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Message persistence
///
/// Every operation is scoped by `queue_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a pending message with an empty token, returning its id
    async fn insert(&self, queue_id: QueueId, content: &str, now: i64) -> Result<MessageId>;

    /// Up to `limit` pending messages, oldest first
    async fn find_pending(&self, queue_id: QueueId, limit: u32) -> Result<Vec<StoredMessage>>;

    /// Atomically mark up to `limit` pending messages as processing under `token`
    ///
    /// Must be a single atomic operation: two concurrent calls can never both
    /// transition the same row. Returns the number of rows claimed.
    async fn claim_pending(&self, queue_id: QueueId, token: &str, limit: u32, now: i64)
        -> Result<u64>;

    /// Messages carrying `token`, oldest first
    async fn find_by_token(&self, queue_id: QueueId, token: &str) -> Result<Vec<StoredMessage>>;

    /// Delete messages carrying `token` and return the deleted rows, oldest first
    ///
    /// Must be a single statement: a row whose token was cleared by
    /// `release_stale` in the meantime is neither deleted nor returned.
    async fn take_by_token(&self, queue_id: QueueId, token: &str) -> Result<Vec<StoredMessage>>;

    /// Delete a single message (no-op if absent or in another queue)
    async fn delete(&self, queue_id: QueueId, id: MessageId) -> Result<u64>;

    /// Return processing messages last updated before `cutoff` to pending
    async fn release_stale(&self, queue_id: QueueId, cutoff: i64, now: i64) -> Result<u64>;

    /// Count messages by status
    async fn count_by_status(&self, queue_id: QueueId, status: MessageStatus) -> Result<i64>;
}
