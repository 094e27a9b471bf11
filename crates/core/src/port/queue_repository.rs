// Queue Repository Port (Interface)

use crate::domain::{QueueId, QueueName};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Queue records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Insert a queue row for `name`, leaving an existing row untouched
    async fn upsert(&self, name: &QueueName) -> Result<()>;

    /// Look up the id for an exact name
    async fn find_id_by_name(&self, name: &QueueName) -> Result<Option<QueueId>>;
}
