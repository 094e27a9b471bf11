// Remove Use Case

use crate::domain::{MessageId, QueueId};
use crate::error::Result;
use crate::port::MessageRepository;
use tracing::debug;

/// Delete one message from the bound queue
///
/// Idempotent: returns `false` when nothing matched, never an error.
pub async fn execute(
    message_repo: &dyn MessageRepository,
    queue_id: QueueId,
    id: MessageId,
) -> Result<bool> {
    let deleted = message_repo.delete(queue_id, id).await?;
    debug!(queue_id = queue_id, message_id = id, deleted = deleted, "Message removed");
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockMessageRepository;

    #[tokio::test]
    async fn test_missing_message_is_not_an_error() {
        let mut repo = MockMessageRepository::new();
        repo.expect_delete()
            .withf(|queue_id, id| *queue_id == 1 && *id == 99)
            .returning(|_, _| Ok(0));

        assert!(!execute(&repo, 1, 99).await.unwrap());
    }

    #[tokio::test]
    async fn test_reports_deletion() {
        let mut repo = MockMessageRepository::new();
        repo.expect_delete().returning(|_, _| Ok(1));

        assert!(execute(&repo, 1, 5).await.unwrap());
    }
}
