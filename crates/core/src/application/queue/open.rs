// Open Queue Use Case (name -> id)

use crate::domain::{QueueId, QueueName};
use crate::error::{AppError, Result};
use crate::port::QueueRepository;
use tracing::debug;

/// Resolve `name` to its queue id, creating the queue row if absent
///
/// The upsert never modifies an existing row, so repeated calls with the
/// same name always resolve to the same id.
pub async fn execute(queue_repo: &dyn QueueRepository, name: &QueueName) -> Result<QueueId> {
    queue_repo.upsert(name).await?;

    let queue_id = queue_repo.find_id_by_name(name).await?.ok_or_else(|| {
        AppError::Consistency(format!("queue '{}' missing after upsert", name))
    })?;

    debug!(queue = %name, queue_id = queue_id, "Queue resolved");
    Ok(queue_id)
}
