// Message Domain Model

use super::error::{DomainError, Result};
use super::queue::QueueId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Store-generated message identifier (unique across queues)
pub type MessageId = i64;

/// Opaque per-claim-call token
pub type ClaimToken = String;

/// Upper bound on ASCII-normalized serialized content length
pub const MAX_CONTENT_BYTES: usize = 65535;

/// Message lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Processing,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Processing => "processing",
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(MessageStatus::Pending),
            "processing" => Ok(MessageStatus::Processing),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

/// How `get_messages` treats the rows it returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// Non-destructive peek at pending messages
    Reader,
    /// Claim pending messages (pending -> processing)
    Worker,
    /// Claim, then delete before returning
    Eater,
}

impl RetrievalMode {
    pub fn claims(&self) -> bool {
        !matches!(self, RetrievalMode::Reader)
    }
}

impl std::fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalMode::Reader => write!(f, "reader"),
            RetrievalMode::Worker => write!(f, "worker"),
            RetrievalMode::Eater => write!(f, "eater"),
        }
    }
}

/// Message payload (any JSON value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContent(serde_json::Value);

impl MessageContent {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Serialize to JSON text, rejecting payloads over `MAX_CONTENT_BYTES`.
    ///
    /// The bound applies to the ASCII-normalized length: every non-ASCII
    /// character is counted as its `\uXXXX` escape.
    pub fn encode(&self) -> std::result::Result<String, crate::error::AppError> {
        let text = serde_json::to_string(&self.0)?;
        let size = ascii_normalized_len(&text);
        if size > MAX_CONTENT_BYTES {
            return Err(DomainError::ContentTooLarge {
                size,
                max: MAX_CONTENT_BYTES,
            }
            .into());
        }
        Ok(text)
    }

    pub fn decode(text: &str) -> std::result::Result<Self, crate::error::AppError> {
        Ok(Self(serde_json::from_str(text)?))
    }
}

/// Byte length of `text` once every non-ASCII char is written as `\uXXXX`
/// (12 bytes for chars outside the BMP, which need a surrogate pair).
pub fn ascii_normalized_len(text: &str) -> usize {
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                1
            } else if (c as u32) <= 0xFFFF {
                6
            } else {
                12
            }
        })
        .sum()
}

/// Message row as persisted (content still encoded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: MessageId,
    pub queue_id: QueueId,
    pub creation_time: i64, // epoch ms
    pub update_time: i64,   // epoch ms
    pub status: MessageStatus,
    pub token: ClaimToken,
    pub content: String,
}

/// Message as handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub queue_id: QueueId,
    pub creation_time: i64,
    pub update_time: i64,
    pub status: MessageStatus,
    pub content: serde_json::Value,
}

impl TryFrom<StoredMessage> for Message {
    type Error = crate::error::AppError;

    fn try_from(stored: StoredMessage) -> std::result::Result<Self, Self::Error> {
        let content = MessageContent::decode(&stored.content)?;
        Ok(Message {
            id: stored.id,
            queue_id: stored.queue_id,
            creation_time: stored.creation_time,
            update_time: stored.update_time,
            status: stored.status,
            content: content.into_value(),
        })
    }
}
