// Retrieve Use Case (reader / worker / eater)

use crate::domain::{Message, QueueId, RetrievalMode, StoredMessage};
use crate::error::Result;
use crate::port::{MessageRepository, TimeProvider, TokenProvider};
use tracing::{debug, warn};

/// Fetch up to `count` messages from the bound queue
///
/// Claim protocol (worker/eater):
/// 1. Generate a token unique to this call
/// 2. Atomically claim up to `count` pending rows under that token
/// 3. Read back exactly the rows carrying the token. The eater reads them
///    back by deleting them in the same statement.
/// 4. Decode their content
///
/// Step 2 is the only synchronization point. Because the token is never
/// reused, step 3 recovers precisely the rows this call claimed. Rows
/// released by a reclaim in between no longer carry the token, so they are
/// neither returned nor (eater) deleted.
pub async fn execute(
    message_repo: &dyn MessageRepository,
    token_provider: &dyn TokenProvider,
    time_provider: &dyn TimeProvider,
    queue_id: QueueId,
    count: u32,
    mode: RetrievalMode,
) -> Result<Vec<Message>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    if !mode.claims() {
        let rows = message_repo.find_pending(queue_id, count).await?;
        return decode_all(rows);
    }

    let token = token_provider.generate_token();
    let now = time_provider.now_millis();

    let claimed = message_repo
        .claim_pending(queue_id, &token, count, now)
        .await?;

    if claimed == 0 {
        debug!(queue_id = queue_id, mode = %mode, "No pending messages to claim");
        return Ok(Vec::new());
    }

    let rows = if mode == RetrievalMode::Eater {
        message_repo.take_by_token(queue_id, &token).await?
    } else {
        message_repo.find_by_token(queue_id, &token).await?
    };

    if rows.len() as u64 != claimed {
        // Only reclaim or removal by another consumer can shrink the set
        warn!(
            queue_id = queue_id,
            claimed = claimed,
            read_back = rows.len(),
            "Claimed rows changed before read-back"
        );
    }

    // Eaten rows are already gone, so a corrupt one cannot wedge the queue
    let messages = decode_all(rows)?;
    debug!(
        queue_id = queue_id,
        mode = %mode,
        count = messages.len(),
        "Messages claimed"
    );
    Ok(messages)
}

fn decode_all(rows: Vec<StoredMessage>) -> Result<Vec<Message>> {
    rows.into_iter().map(Message::try_from).collect()
}
