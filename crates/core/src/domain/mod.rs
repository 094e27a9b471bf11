// Domain Layer - Pure business logic and entities

pub mod error;
pub mod message;
pub mod queue;

// Re-exports
pub use error::DomainError;
pub use message::{
    ClaimToken, Message, MessageContent, MessageId, MessageStatus, RetrievalMode, StoredMessage,
    MAX_CONTENT_BYTES,
};
pub use queue::{QueueId, QueueName, QueueStats, MAX_QUEUE_NAME_CHARS};
