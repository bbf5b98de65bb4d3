use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// Discord user snowflake.
    UserId
);
snowflake!(
    /// Discord guild (server) snowflake.
    GuildId
);
snowflake!(
    /// Discord channel snowflake.
    ChannelId
);

/// One side of a voice-state transition: the channel a user occupies.
///
/// The integration layer builds these from the platform's voice-state
/// objects so the tracker never sees the platform's object model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoicePresence {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub channel_name: String,
}

impl VoicePresence {
    pub fn new(
        user_id: impl Into<UserId>,
        guild_id: impl Into<GuildId>,
        channel_id: impl Into<ChannelId>,
        channel_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
            channel_name: channel_name.into(),
        }
    }
}

/// Minimal snapshot of a guild member, enough for faction resolution
/// and notification text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub display_name: String,
    #[serde(default)]
    pub role_ids: Vec<u64>,
}

impl GuildMember {
    pub fn new(
        user_id: impl Into<UserId>,
        guild_id: impl Into<GuildId>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            guild_id: guild_id.into(),
            display_name: display_name.into(),
            role_ids: Vec::new(),
        }
    }

    pub fn with_roles(mut self, role_ids: impl IntoIterator<Item = u64>) -> Self {
        self.role_ids = role_ids.into_iter().collect();
        self
    }

    pub fn has_role(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }
}
