use async_trait::async_trait;

use crate::application::errors::PostError;

/// Messenger trait - abstraction for posting messages to a channel through
/// the platform adapter.
///
/// Only the /add mirror post goes through this seam; interaction replies
/// are owned by the adapter itself.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post a message to a channel, returning the posted message id.
    async fn post(&self, channel_id: u64, text: &str) -> Result<u64, PostError>;
}
