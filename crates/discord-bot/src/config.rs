use eyre::{eyre, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use voicetrack_core::models::FactionCatalog;
use voicetrack_core::rollup::DEFAULT_ROLLUP_HOUR_UTC;
use voicetrack_core::tracker::TrackerConfig;

/// Configuration for the Discord bot.
///
/// Everything comes from environment variables; only the token and the
/// application ID are required.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Discord bot token (required)
    pub token: String,
    /// Application ID for Discord bot (required)
    pub application_id: u64,
    /// Test guild ID for faster command registration during development
    pub test_guild_id: Option<u64>,
    /// Faction display names in priority order; empty means the built-in catalogue
    pub factions: Vec<String>,
    /// UTC hour the daily leaderboard and reset run at
    pub rollup_hour_utc: u32,
    pub resolve_timeout_ms: u64,
    pub notify_timeout_ms: u64,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("DISCORD_TOKEN")
            .or_else(|| lookup("TOKEN"))
            .ok_or_else(|| eyre!("DISCORD_TOKEN environment variable not set"))?;

        let application_id = lookup("DISCORD_APPLICATION_ID")
            .ok_or_else(|| eyre!("DISCORD_APPLICATION_ID environment variable not set"))?
            .parse::<u64>()
            .map_err(|_| eyre!("DISCORD_APPLICATION_ID must be a valid u64"))?;

        // Optional test guild ID for development
        let test_guild_id = lookup("DISCORD_TEST_GUILD_ID").and_then(|id| id.parse::<u64>().ok());

        let factions = lookup("VOICETRACK_FACTIONS")
            .map(|names| {
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let rollup_hour_utc = match lookup("VOICETRACK_ROLLUP_HOUR_UTC") {
            Some(hour) => hour
                .parse::<u32>()
                .ok()
                .filter(|hour| *hour < 24)
                .ok_or_else(|| eyre!("VOICETRACK_ROLLUP_HOUR_UTC must be an hour between 0 and 23"))?,
            None => DEFAULT_ROLLUP_HOUR_UTC,
        };

        let defaults = TrackerConfig::default();
        let resolve_timeout_ms = parse_millis(
            &lookup,
            "VOICETRACK_RESOLVE_TIMEOUT_MS",
            defaults.resolve_timeout,
        )?;
        let notify_timeout_ms = parse_millis(
            &lookup,
            "VOICETRACK_NOTIFY_TIMEOUT_MS",
            defaults.notify_timeout,
        )?;

        Ok(Self {
            token,
            application_id,
            test_guild_id,
            factions,
            rollup_hour_utc,
            resolve_timeout_ms,
            notify_timeout_ms,
        })
    }

    /// The faction catalogue this deployment tracks.
    pub fn catalog(&self) -> Result<FactionCatalog> {
        if self.factions.is_empty() {
            return Ok(FactionCatalog::default());
        }
        Ok(FactionCatalog::from_names(&self.factions)?)
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            resolve_timeout: Duration::from_millis(self.resolve_timeout_ms),
            notify_timeout: Duration::from_millis(self.notify_timeout_ms),
            ..TrackerConfig::default()
        }
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<u64> {
    match lookup(key) {
        Some(value) => value
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .ok_or_else(|| eyre!("{} must be a positive number of milliseconds", key)),
        None => Ok(default.as_millis() as u64),
    }
}
