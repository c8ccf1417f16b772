//! In-memory entry storage

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::Entry;
use crate::domain::traits::EntryStore;

/// Guild-partitioned in-memory store.
///
/// One table keyed by guild id, each value holding that guild's entries in
/// insertion order. Writers take the lock exclusively; list hands out a
/// snapshot so concurrent readers never observe a partial mutation.
/// Unbounded by design, and gone on restart.
pub struct MemoryStore {
    entries: RwLock<HashMap<u64, Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn append(&self, entry: Entry) {
        let mut entries = self.entries.write().await;
        entries
            .entry(entry.guild_id)
            .or_insert_with(Vec::new)
            .push(entry);
    }

    async fn list_for_guild(&self, guild_id: u64) -> Vec<Entry> {
        let entries = self.entries.read().await;
        entries.get(&guild_id).cloned().unwrap_or_default()
    }

    async fn clear_guild(&self, guild_id: u64) -> usize {
        let mut entries = self.entries.write().await;
        entries.remove(&guild_id).map(|removed| removed.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn entry(guild_id: u64, message: &str) -> Entry {
        Entry::new(guild_id, "Guild", 7, "user", message, Utc::now())
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.append(entry(1, "first")).await;
        store.append(entry(1, "second")).await;
        store.append(entry(1, "third")).await;

        let messages: Vec<String> = store
            .list_for_guild(1)
            .await
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn list_of_unknown_guild_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list_for_guild(404).await.is_empty());
    }

    #[tokio::test]
    async fn clear_returns_count_and_spares_other_guilds() {
        let store = MemoryStore::new();
        store.append(entry(1, "a")).await;
        store.append(entry(1, "b")).await;
        store.append(entry(2, "kept")).await;

        assert_eq!(store.clear_guild(1).await, 2);
        assert!(store.list_for_guild(1).await.is_empty());

        let other = store.list_for_guild(2).await;
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].message, "kept");
    }

    #[tokio::test]
    async fn clear_twice_returns_zero() {
        let store = MemoryStore::new();
        store.append(entry(1, "a")).await;

        assert_eq!(store.clear_guild(1).await, 1);
        assert_eq!(store.clear_guild(1).await, 0);
    }

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let store = Arc::new(MemoryStore::new());

        let mut handles = Vec::new();
        for task in 0..8u64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..25 {
                    store.append(entry(1, &format!("{}-{}", task, i))).await;
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task completed");
        }

        assert_eq!(store.list_for_guild(1).await.len(), 200);
    }
}
