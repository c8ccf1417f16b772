//! watchlist-bot - a Discord bot keeping a per-guild watchlist
//!
//! Four slash commands (/add, /list, /clear, /info) over an in-memory,
//! guild-partitioned entry store. The domain and application layers are
//! platform-neutral; everything Discord-specific lives in the
//! infrastructure adapter.

pub mod application;
pub mod domain;
pub mod infrastructure;
