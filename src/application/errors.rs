//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discord client error: {0}")]
    Client(String),
}

/// Command precondition failures
///
/// Each variant is recovered locally and mapped to an ephemeral reply; none
/// of them reaches the user as a raw error or crashes the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("command restricted to channel {allowed}")]
    ChannelRestricted { allowed: u64 },

    #[error("administrator permission required")]
    PermissionDenied,

    #[error("message text is empty")]
    EmptyMessage,

    #[error("target channel unavailable: {0}")]
    Target(#[from] PostError),

    #[error("unknown command: {0}")]
    Unknown(String),
}

/// Outbound post failures reported by the platform adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("channel not found")]
    ChannelNotFound,

    #[error("missing permission to send messages in channel {0}")]
    Forbidden(u64),

    #[error("network error: {0}")]
    Network(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
