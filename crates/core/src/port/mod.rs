// Port Layer - Interfaces for external dependencies

pub mod message_repository;
pub mod queue_repository;
pub mod time_provider;
pub mod token_provider; // For deterministic testing

// Re-exports
pub use message_repository::MessageRepository;
pub use queue_repository::QueueRepository;
pub use time_provider::TimeProvider;
pub use token_provider::TokenProvider;

#[cfg(test)]
pub use message_repository::MockMessageRepository;
#[cfg(test)]
pub use queue_repository::MockQueueRepository;
