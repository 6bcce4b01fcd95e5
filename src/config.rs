use anyhow::{anyhow, Result};
use std::env;

/// Runtime configuration, loaded once at process start.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot API token. Required.
    pub telegram_bot_token: String,
    /// Database connection string. Required.
    pub database_url: String,
    /// Port for the health check HTTP server.
    pub http_port: u16,
    /// Period of the reminder reconciler, in seconds.
    pub reminder_interval_secs: u64,
}

impl Config {
    /// Reads configuration from the environment. A missing bot token or
    /// database URL is a fatal startup error, not a runtime condition.
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow!("DATABASE_URL must be set"))?;

        if database_url.trim().is_empty() {
            return Err(anyhow!("DATABASE_URL must be set"));
        }

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let interval_str = env::var("REMINDER_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string());
        let reminder_interval_secs = interval_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid REMINDER_INTERVAL_SECS"))?;

        if reminder_interval_secs == 0 {
            return Err(anyhow!("REMINDER_INTERVAL_SECS must be at least 1"));
        }

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            reminder_interval_secs,
        })
    }
}
