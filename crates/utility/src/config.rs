use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::{debug, instrument};

const DEFAULT_PREFIX: &str = "!";
const DEVELOPMENT_ENV: &str = "development";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord: DiscordConfig,
    pub bot: BotConfig,
    pub eden_ai: EdenAiConfig,
}

#[derive(Clone)]
pub struct DiscordConfig {
    pub token: String,
    pub client_id: u64,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub prefix: String,
    pub is_development: bool,
}

#[derive(Clone, Default)]
pub struct EdenAiConfig {
    /// Sent as a bearer token. Requests are still made without it and rejected upstream.
    pub api_key: Option<String>,
}

/// Problems found while reading the environment. All of them are collected
/// before returning, so a single run reports every missing variable.
#[derive(Error, Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<(&'static str, String)>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.missing.is_empty() {
            writeln!(f, "Missing required environment variables:")?;

            for name in &self.missing {
                writeln!(f, "   - {name}")?;
            }
        }

        if !self.invalid.is_empty() {
            writeln!(f, "Invalid environment variables:")?;

            for (name, reason) in &self.invalid {
                writeln!(f, "   - {name}: {reason}")?;
            }
        }

        write!(
            f,
            "\nPlease check your .env file and ensure all required variables are set."
        )
    }
}

impl Config {
    /// Loads `.env` if there is one, then reads the process environment.
    #[instrument]
    pub fn load() -> Result<Arc<Self>, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file."),
            Err(e) => debug!(%e, "No .env file loaded."),
        }

        Self::from_lookup(|name| std::env::var(name).ok()).map(Arc::new)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        let mut required = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(name);
                None
            }
        };

        let token = required("DISCORD_TOKEN");
        let client_id = required("DISCORD_CLIENT_ID");

        let client_id = client_id.and_then(|id| match id.trim().parse::<u64>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                invalid.push(("DISCORD_CLIENT_ID", format!("'{id}' is not a Discord id")));
                None
            }
        });

        let (Some(token), Some(client_id)) = (token, client_id) else {
            return Err(ConfigError { missing, invalid });
        };

        Ok(Self {
            discord: DiscordConfig { token, client_id },
            bot: BotConfig {
                prefix: lookup("BOT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_owned()),
                is_development: lookup("NODE_ENV").as_deref() == Some(DEVELOPMENT_ENV),
            },
            eden_ai: EdenAiConfig {
                api_key: lookup("EDEN_API_KEY").filter(|k| !k.is_empty()),
            },
        })
    }
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl fmt::Debug for EdenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
