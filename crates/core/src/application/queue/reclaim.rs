// Reclaim Use Case (lease expiry for abandoned claims)

use crate::domain::QueueId;
use crate::error::{AppError, Result};
use crate::port::{MessageRepository, TimeProvider};
use tracing::info;

/// Return processing messages older than `window_ms` to pending
///
/// A claim's age is measured from its last status change. Nothing calls this
/// implicitly; a consumer that crashed mid-processing leaves its messages
/// claimed until someone reclaims them.
pub async fn execute(
    message_repo: &dyn MessageRepository,
    time_provider: &dyn TimeProvider,
    queue_id: QueueId,
    window_ms: i64,
) -> Result<u64> {
    if window_ms < 0 {
        return Err(AppError::Validation(format!(
            "reclaim window must be non-negative, got {}ms",
            window_ms
        )));
    }

    let now = time_provider.now_millis();
    let cutoff = now - window_ms;

    let released = message_repo.release_stale(queue_id, cutoff, now).await?;

    if released > 0 {
        info!(
            queue_id = queue_id,
            released = released,
            window_ms = window_ms,
            "Reclaimed stale messages"
        );
    }
    Ok(released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockMessageRepository;

    struct FixedTime;

    impl TimeProvider for FixedTime {
        fn now_millis(&self) -> i64 {
            600_000
        }
    }

    #[tokio::test]
    async fn test_cutoff_is_now_minus_window() {
        let mut repo = MockMessageRepository::new();
        repo.expect_release_stale()
            .withf(|queue_id, cutoff, now| *queue_id == 2 && *cutoff == 300_000 && *now == 600_000)
            .times(1)
            .returning(|_, _, _| Ok(3));

        let released = execute(&repo, &FixedTime, 2, 300_000).await.unwrap();
        assert_eq!(released, 3);
    }

    #[tokio::test]
    async fn test_negative_window_rejected() {
        let repo = MockMessageRepository::new();
        let err = execute(&repo, &FixedTime, 2, -1).await.unwrap_err();
        assert!(err.is_validation());
    }
}
