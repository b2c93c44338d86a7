//! Configuration loader
//!
//! Everything comes from the process environment. The resulting `Config`
//! is built once in `main` and handed to the notifier and the stream by
//! reference.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT";
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_WS_URL: &str = "WS_URL";
pub const ENV_API_BASE: &str = "TELEGRAM_API_BASE";

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

#[derive(Clone)]
pub struct Config {
    pub chat_id: String,
    pub bot_token: String,
    pub ws_url: String,
    pub api_base: String,
    pub timing: Timing,
}

/// Fixed delays used by the stream loop and the event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause between a session ending and the next dial
    pub reconnect_delay: Duration,
    /// Gap between the first and second notification for a matching event
    pub follow_up_delay: Duration,
    /// Wake-up interval of the idle main task
    pub keep_alive: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(5),
            follow_up_delay: Duration::from_secs(10),
            keep_alive: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let chat_id = get(ENV_CHAT_ID);
        let bot_token = get(ENV_BOT_TOKEN);
        let ws_url = get(ENV_WS_URL);

        match (chat_id, bot_token, ws_url) {
            (Some(chat_id), Some(bot_token), Some(ws_url)) => Ok(Self {
                chat_id,
                bot_token,
                ws_url,
                api_base: get(ENV_API_BASE)
                    .map(|base| base.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timing: Timing::default(),
            }),
            (chat_id, bot_token, ws_url) => {
                let mut missing = Vec::new();
                if chat_id.is_none() {
                    missing.push(ENV_CHAT_ID);
                }
                if bot_token.is_none() {
                    missing.push(ENV_BOT_TOKEN);
                }
                if ws_url.is_none() {
                    missing.push(ENV_WS_URL);
                }
                Err(ConfigError::Missing(missing))
            }
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}

// Keeps the bot token out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("chat_id", &self.chat_id)
            .field("bot_token", &"<redacted>")
            .field("ws_url", &self.ws_url)
            .field("api_base", &self.api_base)
            .field("timing", &self.timing)
            .finish()
    }
}
