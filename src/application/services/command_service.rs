//! Command service - the watchlist command handlers
//!
//! Holds the entry store and the configured allowed/target channel, routes
//! invocations by command name, and turns precondition failures into
//! user-visible ephemeral replies. Everything here is platform-neutral;
//! outbound posts go through the [`Messenger`] seam.

use std::sync::Arc;

use crate::application::errors::{CommandError, PostError};
use crate::domain::entities::{CommandRegistry, CommandSpec, Entry, Invocation, ParamSpec, Reply};
use crate::domain::traits::{EntryStore, Messenger};

/// How many entries /list shows at most.
const LIST_LIMIT: usize = 10;

/// Channel-restriction check: permitted when no channel is configured, or
/// when the invocation came from exactly the configured channel.
pub fn channel_permitted(configured: Option<u64>, channel_id: u64) -> bool {
    configured.map_or(true, |allowed| allowed == channel_id)
}

/// Service executing the four watchlist commands
pub struct CommandService {
    registry: CommandRegistry,
    store: Arc<dyn EntryStore>,
    /// Allowed/target channel. None means no restriction and no mirror post.
    channel_id: Option<u64>,
}

impl CommandService {
    pub fn new(store: Arc<dyn EntryStore>, channel_id: Option<u64>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            store,
            channel_id,
        }
    }

    pub fn register(&mut self, spec: CommandSpec) {
        self.registry.register(spec);
    }

    pub fn register_defaults(&mut self) {
        self.register(
            CommandSpec::new("add")
                .with_description("Add a message to the watchlist channel")
                .with_param(ParamSpec::string("message", "The message you want to add").required()),
        );

        self.register(CommandSpec::new("list").with_description("List all added messages"));

        self.register(
            CommandSpec::new("clear").with_description("Clear all added messages (Admin only)"),
        );

        self.register(
            CommandSpec::new("info").with_description("Show bot info and server details"),
        );
    }

    /// Registered command definitions, for platform registration.
    pub fn specs(&self) -> impl Iterator<Item = &CommandSpec> {
        self.registry.all()
    }

    pub fn target_channel(&self) -> Option<u64> {
        self.channel_id
    }

    /// Execute one invocation and produce its single reply.
    pub async fn dispatch(
        &self,
        messenger: &dyn Messenger,
        name: &str,
        invocation: &Invocation,
    ) -> Reply {
        if !self.registry.contains(name) {
            return self.failure_reply(CommandError::Unknown(name.to_string()));
        }

        let result = match name {
            "add" => self.add(messenger, invocation).await,
            "list" => self.list(invocation).await,
            "clear" => self.clear(invocation).await,
            "info" => Ok(self.info(invocation)),
            other => Err(CommandError::Unknown(other.to_string())),
        };

        result.unwrap_or_else(|err| self.failure_reply(err))
    }

    /// /add - append an entry, mirroring it to the configured channel first
    /// when one is set. The store is only touched after the mirror post
    /// succeeded, so target failures never leave a dangling entry.
    async fn add(
        &self,
        messenger: &dyn Messenger,
        invocation: &Invocation,
    ) -> Result<Reply, CommandError> {
        self.check_channel(invocation.channel_id)?;

        let message = invocation.message.as_deref().map(str::trim).unwrap_or_default();
        if message.is_empty() {
            return Err(CommandError::EmptyMessage);
        }

        let mut entry = Entry::new(
            invocation.guild_id,
            &invocation.guild_name,
            invocation.user_id,
            &invocation.user_name,
            message,
            invocation.created_at,
        );

        let reply = match self.channel_id {
            Some(target) => {
                let post = format!("**Added by <@{}>:**\n> {}", invocation.user_id, message);
                let message_id = messenger.post(target, &post).await?;
                entry = entry.with_posted_message_id(message_id);
                Reply::ephemeral(format!("✅ Message posted to <#{}>", target))
            }
            None => Reply::public(format!(
                "✅ **{}** added: {}",
                invocation.user_name, message
            )),
        };

        self.store.append(entry).await;

        tracing::info!(
            "[add] [{}] {}: {}",
            invocation.guild_name,
            invocation.user_name,
            message
        );

        Ok(reply)
    }

    /// /list - the guild's most recent entries, oldest-first among the
    /// shown ones. Never paginates past the last 10.
    async fn list(&self, invocation: &Invocation) -> Result<Reply, CommandError> {
        self.check_channel(invocation.channel_id)?;

        let entries = self.store.list_for_guild(invocation.guild_id).await;
        if entries.is_empty() {
            return Ok(Reply::ephemeral(
                "📭 No messages have been added yet in this server.",
            ));
        }

        let shown = entries.len().min(LIST_LIMIT);
        let lines: Vec<String> = entries[entries.len() - shown..]
            .iter()
            .map(|entry| format!("• **{}**: {}", entry.user_name, entry.message))
            .collect();

        Ok(Reply::ephemeral(format!(
            "📋 **Added Messages** (showing last {}):\n{}",
            shown,
            lines.join("\n")
        )))
    }

    /// /clear - remove every entry of the invoking guild. Removing zero
    /// entries is not an error; the count is reported either way.
    async fn clear(&self, invocation: &Invocation) -> Result<Reply, CommandError> {
        self.check_channel(invocation.channel_id)?;

        if !invocation.is_administrator {
            return Err(CommandError::PermissionDenied);
        }

        let count = self.store.clear_guild(invocation.guild_id).await;

        tracing::info!(
            "[clear] [{}] {} removed {} entr(y/ies)",
            invocation.guild_name,
            invocation.user_name,
            count
        );

        Ok(Reply::ephemeral(format!(
            "🗑️ Cleared {} message(s) from this server.",
            count
        )))
    }

    /// /info - static details about the guild and configuration. Always
    /// succeeds, no channel restriction.
    fn info(&self, invocation: &Invocation) -> Reply {
        let mut text = format!(
            "**Server Info**\n\
             • Name: {}\n\
             • Server ID: `{}`\n\
             • This Channel ID: `{}`\n\
             • Your ID: `{}`\n",
            invocation.guild_name, invocation.guild_id, invocation.channel_id, invocation.user_id
        );

        match self.channel_id {
            Some(id) => text.push_str(&format!("• Target Channel: <#{}>", id)),
            None => text.push_str("• Target Channel: Not configured"),
        }

        Reply::ephemeral(text)
    }

    fn check_channel(&self, channel_id: u64) -> Result<(), CommandError> {
        if channel_permitted(self.channel_id, channel_id) {
            Ok(())
        } else {
            let allowed = self.channel_id.unwrap_or_default();
            Err(CommandError::ChannelRestricted { allowed })
        }
    }

    fn failure_reply(&self, err: CommandError) -> Reply {
        let text = match err {
            CommandError::ChannelRestricted { allowed } => {
                format!("❌ This command can only be used in <#{}>.", allowed)
            }
            CommandError::PermissionDenied => {
                "❌ You need administrator permissions to use this command.".to_string()
            }
            CommandError::EmptyMessage => "❌ Message cannot be empty.".to_string(),
            CommandError::Target(PostError::ChannelNotFound) => {
                "❌ Target channel not found. Please check the bot configuration.".to_string()
            }
            CommandError::Target(PostError::Forbidden(channel)) => {
                format!("❌ I don't have permission to send messages in <#{}>", channel)
            }
            CommandError::Target(PostError::Network(ref reason)) => {
                tracing::error!("Mirror post failed: {}", reason);
                "❌ Failed to post to the target channel. Please try again later.".to_string()
            }
            CommandError::Unknown(name) => format!("Unknown command: /{}", name),
        };

        Reply::ephemeral(text)
    }
}
