//! Persisted emoji-log record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged annotation. Immutable once created; serialized into the
/// on-disk JSON array as `{id, timestamp, emoji}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmojiEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub emoji: String,
}

impl EmojiEntry {
    /// New entry stamped with the current wall clock.
    pub fn new(emoji: impl Into<String>) -> Self {
        Self::at(Utc::now(), emoji)
    }

    pub fn at(timestamp: DateTime<Utc>, emoji: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            emoji: emoji.into(),
        }
    }
}
