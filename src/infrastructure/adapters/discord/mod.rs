//! Discord adapter
//!
//! Wires the platform-neutral command service into serenity: registers the
//! slash commands when the gateway session is ready, translates incoming
//! command interactions into [`Invocation`]s, and sends replies and mirror
//! posts back through Discord's HTTP API. Everything Discord-specific stays
//! in this module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, Client, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseMessage,
    CreateMessage, EventHandler, GatewayIntents, GuildId, Interaction, Ready, ResolvedValue,
};
use serenity::async_trait;
use serenity::http::{Http, HttpError};

use crate::application::errors::{BotError, PostError};
use crate::application::services::CommandService;
use crate::domain::entities::{Invocation, Reply};
use crate::domain::traits::Messenger;

// Discord JSON error codes relevant to channel posts.
const UNKNOWN_CHANNEL: isize = 10003;
const MISSING_ACCESS: isize = 50001;
const MISSING_PERMISSIONS: isize = 50013;

/// Messenger over Discord's HTTP API.
pub struct HttpMessenger {
    http: Arc<Http>,
}

impl HttpMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    async fn post(&self, channel_id: u64, text: &str) -> Result<u64, PostError> {
        let builder = CreateMessage::new().content(text);
        match ChannelId::new(channel_id).send_message(&self.http, builder).await {
            Ok(message) => Ok(message.id.get()),
            Err(err) => Err(map_send_error(err, channel_id)),
        }
    }
}

fn map_send_error(err: serenity::Error, channel_id: u64) -> PostError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response)) = err {
        return match response.error.code {
            UNKNOWN_CHANNEL => PostError::ChannelNotFound,
            MISSING_ACCESS | MISSING_PERMISSIONS => PostError::Forbidden(channel_id),
            _ => PostError::Network(err.to_string()),
        };
    }
    PostError::Network(err.to_string())
}

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    service: CommandService,
}

impl DiscordHandler {
    pub fn new(service: CommandService) -> Self {
        Self { service }
    }

    /// Slash commands need no privileged intents.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::non_privileged()
    }

    async fn handle_command(&self, ctx: &Context, command: CommandInteraction) {
        let Some(guild_id) = command.guild_id else {
            // Entries always belong to a guild; DMs are rejected up front.
            let reply = Reply::ephemeral("❌ This command is only available in a server.");
            self.respond(ctx, &command, &reply).await;
            return;
        };

        let invocation = build_invocation(ctx, &command, guild_id);
        let messenger = HttpMessenger::new(ctx.http.clone());
        let reply = self
            .service
            .dispatch(&messenger, &command.data.name, &invocation)
            .await;
        self.respond(ctx, &command, &reply).await;
    }

    async fn respond(&self, ctx: &Context, command: &CommandInteraction, reply: &Reply) {
        let message = CreateInteractionResponseMessage::new()
            .content(&reply.text)
            .ephemeral(reply.is_ephemeral());
        let response = CreateInteractionResponse::Message(message);

        if let Err(err) = command.create_response(&ctx.http, response).await {
            tracing::error!("Failed to respond to /{}: {}", command.data.name, err);
        }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("Logged in as {} (ID: {})", ready.user.name, ready.user.id);
        tracing::info!("Connected to {} server(s)", ready.guilds.len());

        match self.service.target_channel() {
            Some(id) => tracing::info!("Messages will be posted to channel ID: {}", id),
            None => tracing::warn!("TARGET_CHANNEL_ID not set"),
        }

        // Idempotent upsert of the global command set; a failure here is
        // not fatal, the bot keeps running with whatever was registered.
        match serenity::all::Command::set_global_commands(
            &ctx.http,
            command_definitions(&self.service),
        )
        .await
        {
            Ok(synced) => tracing::info!("Synced {} command(s) globally", synced.len()),
            Err(err) => tracing::warn!("Failed to sync commands: {}", err),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, command).await;
        }
    }
}

/// Render the registered command specs into serenity builders.
fn command_definitions(service: &CommandService) -> Vec<CreateCommand> {
    service
        .specs()
        .map(|spec| {
            let mut command = CreateCommand::new(&spec.name).description(&spec.description);
            for param in &spec.params {
                command = command.add_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        &param.name,
                        &param.description,
                    )
                    .required(param.required),
                );
            }
            command
        })
        .collect()
}

fn build_invocation(ctx: &Context, command: &CommandInteraction, guild_id: GuildId) -> Invocation {
    // Guild name comes from the gateway cache; entries keep whatever name
    // the guild had at creation time.
    let guild_name = ctx
        .cache
        .guild(guild_id)
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| guild_id.to_string());

    // Permissions arrive pre-computed on the interaction's member.
    let is_administrator = command
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .map(|permissions| permissions.administrator())
        .unwrap_or(false);

    let created_at = DateTime::from_timestamp(command.id.created_at().unix_timestamp(), 0)
        .unwrap_or_else(Utc::now);

    let mut invocation = Invocation::new(
        guild_id.get(),
        command.channel_id.get(),
        command.user.id.get(),
    )
    .with_guild_name(guild_name)
    .with_user_name(command.user.name.clone())
    .with_administrator(is_administrator)
    .with_created_at(created_at);

    if let Some(message) = message_option(command) {
        invocation = invocation.with_message(message);
    }

    invocation
}

fn message_option(command: &CommandInteraction) -> Option<String> {
    command
        .data
        .options()
        .into_iter()
        .find(|option| option.name == "message")
        .and_then(|option| match option.value {
            ResolvedValue::String(value) => Some(value.to_string()),
            _ => None,
        })
}

/// Connect to Discord and run the event loop until the process exits.
pub async fn run(token: &str, service: CommandService) -> Result<(), BotError> {
    let handler = DiscordHandler::new(service);

    let mut client = Client::builder(token, DiscordHandler::intents())
        .event_handler(handler)
        .await
        .map_err(|err| BotError::Client(err.to_string()))?;

    client
        .start()
        .await
        .map_err(|err| BotError::Client(err.to_string()))
}
