use chrono::{DateTime, Utc};

/// Context of one slash-command invocation, independent of the platform
/// adapter that produced it.
///
/// The adapter guarantees `guild_id` is a real guild; direct-message
/// invocations are rejected before the command service runs.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub guild_id: u64,
    pub guild_name: String,
    pub channel_id: u64,
    pub user_id: u64,
    pub user_name: String,
    pub is_administrator: bool,
    /// The `message` option, present only for /add.
    pub message: Option<String>,
    /// Creation time of the invocation, from the platform.
    pub created_at: DateTime<Utc>,
}

impl Invocation {
    pub fn new(guild_id: u64, channel_id: u64, user_id: u64) -> Self {
        Self {
            guild_id,
            guild_name: String::new(),
            channel_id,
            user_id,
            user_name: String::new(),
            is_administrator: false,
            message: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_guild_name(mut self, name: impl Into<String>) -> Self {
        self.guild_name = name.into();
        self
    }

    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = name.into();
        self
    }

    pub fn with_administrator(mut self, is_admin: bool) -> Self {
        self.is_administrator = is_admin;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
