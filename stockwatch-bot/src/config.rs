use std::env;
use std::time::Duration;

use anyhow::Context as _;

pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(300);
pub const MIN_MONITOR_INTERVAL: Duration = Duration::from_secs(10);

/// Process settings read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub database_url: String,
    /// Register commands in this guild only; global registration when unset.
    pub guild_id: Option<u64>,
    pub monitor_enabled: bool,
    pub monitor_interval: Duration,
    pub redis_enabled: bool,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub auto_run_migrations: bool,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is required")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let guild_id = match env_string("DISCORD_GUILD_ID") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .with_context(|| format!("DISCORD_GUILD_ID is not a guild id: `{raw}`"))?,
            ),
            None => None,
        };

        let interval_seconds = env_u64(
            "MONITOR_INTERVAL_SECONDS",
            DEFAULT_MONITOR_INTERVAL.as_secs(),
        );

        Ok(Self {
            token,
            database_url,
            guild_id,
            monitor_enabled: env_bool("MONITOR_ENABLED", true),
            monitor_interval: Duration::from_secs(interval_seconds).max(MIN_MONITOR_INTERVAL),
            redis_enabled: env_bool("REDIS_ENABLED", false),
            redis_url: env_string("REDIS_URL"),
            redis_key_prefix: env_string("REDIS_KEY_PREFIX")
                .unwrap_or_else(|| "stockwatch:prod".to_owned()),
            auto_run_migrations: env_bool("AUTO_RUN_MIGRATIONS", true),
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |value| parse_bool(&value))
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
