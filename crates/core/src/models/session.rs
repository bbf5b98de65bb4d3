use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::discord::{ChannelId, GuildId, UserId, VoicePresence};
use super::faction::FactionKey;

/// A voice connection that has started but not yet been closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSession {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub start_time: DateTime<Utc>,
}

impl OpenSession {
    pub fn start(presence: &VoicePresence, start_time: DateTime<Utc>) -> Self {
        Self {
            user_id: presence.user_id,
            guild_id: presence.guild_id,
            channel_id: presence.channel_id,
            channel_name: presence.channel_name.clone(),
            start_time,
        }
    }

    /// Milliseconds between the session start and `now`, clamped at zero.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_time).num_milliseconds().max(0) as u64
    }
}

/// Accumulated voice statistics for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTimeRecord {
    pub total_time_ms: u64,
    pub session_count: u64,
    pub longest_session_ms: u64,
    pub today_time_ms: u64,
    pub last_active_at: Option<DateTime<Utc>>,
}

impl UserTimeRecord {
    /// The record as it would look after committing one more session.
    ///
    /// Returns `None` if any counter would overflow; the caller decides
    /// how loudly to fail.
    pub fn with_session(&self, elapsed_ms: u64, closed_at: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            total_time_ms: self.total_time_ms.checked_add(elapsed_ms)?,
            session_count: self.session_count.checked_add(1)?,
            longest_session_ms: self.longest_session_ms.max(elapsed_ms),
            today_time_ms: self.today_time_ms.checked_add(elapsed_ms)?,
            last_active_at: Some(closed_at),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Left,
    Switched,
}

/// Payload describing a committed session, handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedSession {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub faction: Option<FactionKey>,
    pub reason: CloseReason,
    /// Channel the user moved into, for switches.
    pub next_channel_name: Option<String>,
}

/// What the points and achievement hooks see after a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCommit {
    pub user_id: UserId,
    pub guild_id: GuildId,
    pub elapsed_ms: u64,
    pub new_total_ms: u64,
    pub faction: Option<FactionKey>,
}
