// Queue Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Store-generated queue identifier
pub type QueueId = i64;

/// Maximum queue name length, counted in Unicode code points
pub const MAX_QUEUE_NAME_CHARS: usize = 25;

/// Validated queue name (1-25 code points)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let len = name.chars().count();

        if len == 0 {
            return Err(DomainError::InvalidQueueName(
                "queue name cannot be empty".to_string(),
            ));
        }
        if len > MAX_QUEUE_NAME_CHARS {
            return Err(DomainError::InvalidQueueName(format!(
                "queue name too long: {} chars (max {})",
                len, MAX_QUEUE_NAME_CHARS
            )));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QueueName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<QueueName> for String {
    fn from(name: QueueName) -> Self {
        name.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message counts per status for one queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
}

impl QueueStats {
    pub fn total(&self) -> i64 {
        self.pending + self.processing
    }
}
