use async_trait::async_trait;

use crate::domain::entities::Entry;

/// EntryStore trait - abstraction over the in-memory entry table.
///
/// All access is partitioned by guild id. Entries live for the lifetime of
/// the process; losing them on restart is an accepted property, not a bug.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Append an entry to its guild's sequence. Unbounded, never fails.
    async fn append(&self, entry: Entry);

    /// All entries for a guild in insertion order; empty when none exist.
    async fn list_for_guild(&self, guild_id: u64) -> Vec<Entry>;

    /// Remove every entry for a guild, returning how many were removed.
    /// Entries of other guilds keep their content and relative order.
    async fn clear_guild(&self, guild_id: u64) -> usize;
}
