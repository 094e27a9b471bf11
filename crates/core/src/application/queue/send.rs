// Send Use Case

use crate::domain::{MessageContent, MessageId, QueueId};
use crate::error::Result;
use crate::port::{MessageRepository, TimeProvider};
use tracing::debug;

/// Validate and enqueue `content` as a pending message
///
/// Size validation happens before the store is touched, so a rejected
/// message leaves no row behind.
pub async fn execute(
    message_repo: &dyn MessageRepository,
    time_provider: &dyn TimeProvider,
    queue_id: QueueId,
    content: &MessageContent,
) -> Result<MessageId> {
    let encoded = content.encode()?;
    let now = time_provider.now_millis();

    let id = message_repo.insert(queue_id, &encoded, now).await?;

    debug!(queue_id = queue_id, message_id = id, bytes = encoded.len(), "Message sent");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_CONTENT_BYTES;
    use crate::port::MockMessageRepository;
    use serde_json::json;

    struct FixedTime(i64);

    impl TimeProvider for FixedTime {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    #[tokio::test]
    async fn test_inserts_encoded_content() {
        let mut repo = MockMessageRepository::new();
        repo.expect_insert()
            .withf(|queue_id, content, now| {
                *queue_id == 3 && content == r#"{"task":"resize","w":100}"# && *now == 1_000
            })
            .times(1)
            .returning(|_, _, _| Ok(17));

        let content = MessageContent::new(json!({"task": "resize", "w": 100}));
        let id = execute(&repo, &FixedTime(1_000), 3, &content).await.unwrap();
        assert_eq!(id, 17);
    }

    #[tokio::test]
    async fn test_oversized_content_never_reaches_store() {
        // No expectations: any repository call panics
        let repo = MockMessageRepository::new();

        let content = MessageContent::new(json!("x".repeat(MAX_CONTENT_BYTES)));
        let err = execute(&repo, &FixedTime(0), 3, &content).await.unwrap_err();
        assert!(err.is_validation());
    }
}
