//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordConfig {
    /// Bot credential token. The process refuses to start without one.
    pub token: Option<String>,
    /// Allowed/target channel id. Zero or absent means no restriction and
    /// no mirror post.
    pub channel_id: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "watchlist-bot".to_string(),
            },
            discord: DiscordConfig {
                token: None,
                channel_id: None,
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        Config::default().with_env()
    }

    /// Apply environment overrides. DISCORD_BOT_TOKEN and TARGET_CHANNEL_ID
    /// win over whatever the config file said.
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
            if !token.trim().is_empty() {
                self.discord.token = Some(token);
            }
        }

        if let Ok(raw) = std::env::var("TARGET_CHANNEL_ID") {
            let raw = raw.trim();
            if !raw.is_empty() {
                let id: u64 = raw.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "TARGET_CHANNEL_ID must be a numeric channel id, got {:?}",
                        raw
                    ))
                })?;
                self.discord.channel_id = Some(id);
            }
        }

        Ok(self)
    }

    /// The configured allowed/target channel, with `0` treated as unset.
    pub fn target_channel(&self) -> Option<u64> {
        self.discord.channel_id.filter(|id| *id != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_yaml() {
        let yaml = "\
bot:
  name: watchlist-bot
discord:
  token: abc123
  channel-id: 77
";
        let config: Config = serde_yaml::from_str(yaml).expect("valid config");
        assert_eq!(config.bot.name, "watchlist-bot");
        assert_eq!(config.discord.token.as_deref(), Some("abc123"));
        assert_eq!(config.target_channel(), Some(77));
    }

    #[test]
    fn zero_channel_id_means_unset() {
        let mut config = Config::default();
        config.discord.channel_id = Some(0);
        assert_eq!(config.target_channel(), None);

        config.discord.channel_id = None;
        assert_eq!(config.target_channel(), None);

        config.discord.channel_id = Some(42);
        assert_eq!(config.target_channel(), Some(42));
    }

    #[test]
    fn env_overrides_and_rejects_garbage() {
        std::env::set_var("DISCORD_BOT_TOKEN", "env-token");
        std::env::set_var("TARGET_CHANNEL_ID", "123456");

        let config = Config::load_env().expect("valid env");
        assert_eq!(config.discord.token.as_deref(), Some("env-token"));
        assert_eq!(config.target_channel(), Some(123456));

        std::env::set_var("TARGET_CHANNEL_ID", "not-a-number");
        assert!(Config::load_env().is_err());

        std::env::remove_var("DISCORD_BOT_TOKEN");
        std::env::remove_var("TARGET_CHANNEL_ID");
    }
}
