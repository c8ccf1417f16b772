//! Watchlist Command Flow Integration Tests
//! Run with: cargo test --test command_flow_test

use std::sync::{Arc, Once};

use watchlist_bot::application::errors::PostError;
use watchlist_bot::application::services::CommandService;
use watchlist_bot::domain::entities::{Invocation, Visibility};
use watchlist_bot::domain::traits::{EntryStore, Messenger};
use watchlist_bot::infrastructure::storage::MemoryStore;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::init();
    });
}

/// Messenger double capturing mirror posts.
struct CapturingMessenger {
    posts: tokio::sync::Mutex<Vec<(u64, String)>>,
}

impl CapturingMessenger {
    fn new() -> Self {
        Self {
            posts: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Messenger for CapturingMessenger {
    async fn post(&self, channel_id: u64, text: &str) -> Result<u64, PostError> {
        let mut posts = self.posts.lock().await;
        posts.push((channel_id, text.to_string()));
        Ok(1_000 + posts.len() as u64)
    }
}

fn wire_service(channel_id: Option<u64>) -> (CommandService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut service = CommandService::new(store.clone(), channel_id);
    service.register_defaults();
    (service, store)
}

fn invocation(guild_id: u64, channel_id: u64, user_id: u64, user_name: &str) -> Invocation {
    Invocation::new(guild_id, channel_id, user_id)
        .with_guild_name(format!("Guild {}", guild_id))
        .with_user_name(user_name)
}

/// A full session in one guild must not leak into another guild's view.
#[tokio::test]
async fn watchlist_session_is_partitioned_by_guild() {
    ensure_init();

    let (service, store) = wire_service(None);
    let messenger = CapturingMessenger::new();

    let alice = invocation(1, 10, 100, "alice");
    let bob = invocation(1, 10, 101, "bob");
    let carol = invocation(2, 20, 200, "carol");

    service
        .dispatch(&messenger, "add", &alice.clone().with_message("first find"))
        .await;
    service
        .dispatch(&messenger, "add", &bob.clone().with_message("second find"))
        .await;
    service
        .dispatch(&messenger, "add", &carol.clone().with_message("elsewhere"))
        .await;

    let listing = service.dispatch(&messenger, "list", &alice).await;
    assert!(listing.text.contains("first find"));
    assert!(listing.text.contains("second find"));
    assert!(!listing.text.contains("elsewhere"));

    let cleared = service
        .dispatch(&messenger, "clear", &alice.clone().with_administrator(true))
        .await;
    assert!(cleared.text.contains("Cleared 2 message(s)"));

    assert!(store.list_for_guild(1).await.is_empty());
    assert_eq!(store.list_for_guild(2).await.len(), 1);

    let other_listing = service.dispatch(&messenger, "list", &carol).await;
    assert!(other_listing.text.contains("elsewhere"));
}

/// With a configured channel, commands are rejected elsewhere and /add
/// mirrors into that channel.
#[tokio::test]
async fn restricted_channel_gates_commands_and_mirrors_adds() {
    ensure_init();

    let (service, store) = wire_service(Some(77));
    let messenger = CapturingMessenger::new();

    let outside = invocation(1, 55, 100, "alice");
    let inside = invocation(1, 77, 100, "alice");

    let rejected = service
        .dispatch(&messenger, "add", &outside.clone().with_message("nope"))
        .await;
    assert_eq!(rejected.visibility, Visibility::Ephemeral);
    assert!(rejected.text.contains("<#77>"));
    assert!(store.list_for_guild(1).await.is_empty());

    let accepted = service
        .dispatch(&messenger, "add", &inside.clone().with_message("watch this"))
        .await;
    assert_eq!(accepted.visibility, Visibility::Ephemeral);
    assert!(accepted.text.contains("<#77>"));

    let posts = messenger.posts.lock().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, 77);
    assert!(posts[0].1.contains("> watch this"));
    drop(posts);

    let entries = store.list_for_guild(1).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].posted_message_id, Some(1_001));

    let listing_rejected = service.dispatch(&messenger, "list", &outside).await;
    assert!(listing_rejected.text.contains("can only be used"));

    let listing = service.dispatch(&messenger, "list", &inside).await;
    assert!(listing.text.contains("watch this"));

    // /info has no channel restriction.
    let info = service.dispatch(&messenger, "info", &outside).await;
    assert!(info.text.contains("**Server Info**"));
    assert!(info.text.contains("<#77>"));
}
