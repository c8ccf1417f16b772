use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single watchlist entry submitted through /add.
///
/// Entries are immutable once created; there is no update path. The guild
/// id is the partition key for every store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub guild_id: u64,
    pub guild_name: String,
    pub user_name: String,
    pub user_id: u64,
    pub message: String,
    /// Id of the mirror post in the configured channel, when one was made.
    pub posted_message_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        guild_id: u64,
        guild_name: impl Into<String>,
        user_id: u64,
        user_name: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            guild_id,
            guild_name: guild_name.into(),
            user_name: user_name.into(),
            user_id,
            message: message.into(),
            posted_message_id: None,
            created_at,
        }
    }

    pub fn with_posted_message_id(mut self, message_id: u64) -> Self {
        self.posted_message_id = Some(message_id);
        self
    }
}
