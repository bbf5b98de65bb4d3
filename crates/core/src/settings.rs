use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::collaborators::FeatureFlags;
use crate::models::{ChannelId, GuildId};

/// Per-guild bot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub factions_enabled: bool,
    /// Text channel that receives clock-in/clock-out messages.
    pub clock_channel_id: Option<ChannelId>,
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self {
            factions_enabled: true,
            clock_channel_id: None,
        }
    }
}

/// Volatile settings store; guilds without an entry get the defaults.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    guilds: RwLock<HashMap<GuildId, GuildSettings>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, guild_id: GuildId) -> GuildSettings {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_faction_tracking(&self, guild_id: GuildId, enabled: bool) {
        self.guilds
            .write()
            .await
            .entry(guild_id)
            .or_default()
            .factions_enabled = enabled;
    }

    pub async fn set_clock_channel(&self, guild_id: GuildId, channel_id: Option<ChannelId>) {
        self.guilds
            .write()
            .await
            .entry(guild_id)
            .or_default()
            .clock_channel_id = channel_id;
    }

    pub async fn clock_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.get(guild_id).await.clock_channel_id
    }

    /// Every guild that has a clock channel configured.
    pub async fn clock_channels(&self) -> Vec<(GuildId, ChannelId)> {
        let guilds = self.guilds.read().await;
        let mut channels: Vec<_> = guilds
            .iter()
            .filter_map(|(guild, settings)| settings.clock_channel_id.map(|c| (*guild, c)))
            .collect();
        channels.sort();
        channels
    }
}

#[async_trait]
impl FeatureFlags for InMemorySettings {
    async fn is_faction_tracking_enabled(&self, guild_id: GuildId) -> bool {
        self.get(guild_id).await.factions_enabled
    }
}
