use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::MessageId;

/// Represents a message, stored once it has been sent to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sequential id issued by the repository
    pub id: MessageId,
    /// Message content
    pub content: String,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(id: MessageId, content: impl Into<String>) -> Self {
        Self::with_timestamp(id, content, Utc::now())
    }

    /// Create a message with an explicit creation time
    pub fn with_timestamp(
        id: MessageId,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            timestamp,
        }
    }

    /// Check if the message was created strictly between `start` and `end`
    pub fn is_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.timestamp > start && self.timestamp < end
    }
}
