use clap::{Parser, Subcommand};
use std::sync::Arc;

use watchlist_bot::application::errors::ConfigError;
use watchlist_bot::application::services::CommandService;
use watchlist_bot::infrastructure::adapters::discord;
use watchlist_bot::infrastructure::config::Config;
use watchlist_bot::infrastructure::storage::MemoryStore;

#[derive(Parser)]
#[command(name = "watchlist-bot")]
#[command(about = "A Discord watchlist bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and environment)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // .env is honored before anything reads the environment.
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("watchlist-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    // The credential token is the one piece of config the bot cannot run
    // without.
    let token = match token_override.or_else(|| config.discord.token.clone()) {
        Some(token) => token,
        None => {
            tracing::error!(
                "Discord bot token is not set (DISCORD_BOT_TOKEN or discord.token); refusing to start"
            );
            std::process::exit(1);
        }
    };

    tracing::info!("Starting {}", config.bot.name);

    let store = Arc::new(MemoryStore::new());
    let mut service = CommandService::new(store, config.target_channel());
    service.register_defaults();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        if let Err(err) = discord::run(&token, service).await {
            tracing::error!("Bot stopped: {}", err);
        }
    });
}

fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let config = if std::path::Path::new(config_path).exists() {
        match Config::load(config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to load config: {}, using defaults", err);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    config.with_env()
}

fn init_config() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
}
