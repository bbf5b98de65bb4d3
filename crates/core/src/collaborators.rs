//! Seams between the tracker and the outside world.
//!
//! The tracker owns duration accounting and nothing else. Working out a
//! member's faction, reading per-guild feature flags, telling people about
//! sessions and handing out rewards all go through these traits, so the
//! tracker can be driven by the Discord integration, the tests, or anything
//! else that can produce voice presence pairs.

use async_trait::async_trait;

use crate::errors::TrackerResult;
use crate::models::{ClosedSession, FactionKey, GuildId, GuildMember, OpenSession, SessionCommit};

/// Maps a member to at most one faction.
///
/// Implementations must be free of side effects; the tracker calls this at
/// session close and may call it again for the same member at any time.
#[async_trait]
pub trait FactionResolver: Send + Sync {
    async fn resolve(&self, member: &GuildMember) -> TrackerResult<Option<FactionKey>>;
}

/// Per-guild feature flags.
#[async_trait]
pub trait FeatureFlags: Send + Sync {
    /// Defaults to `true` for guilds without an explicit setting.
    async fn is_faction_tracking_enabled(&self, guild_id: GuildId) -> bool;
}

/// Best-effort delivery of session events to people.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn session_opened(&self, _session: &OpenSession, _member: &GuildMember) -> TrackerResult<()> {
        Ok(())
    }

    async fn session_closed(&self, session: &ClosedSession, member: &GuildMember) -> TrackerResult<()>;
}

/// Side channel invoked after every successful aggregate commit.
#[async_trait]
pub trait SessionHook: Send + Sync {
    async fn session_committed(&self, commit: &SessionCommit) -> TrackerResult<()>;
}

/// Resolver for deployments that do not use factions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFactions;

#[async_trait]
impl FactionResolver for NoFactions {
    async fn resolve(&self, _member: &GuildMember) -> TrackerResult<Option<FactionKey>> {
        Ok(None)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn session_closed(&self, _session: &ClosedSession, _member: &GuildMember) -> TrackerResult<()> {
        Ok(())
    }
}
