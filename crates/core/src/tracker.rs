//! The voice session tracker.
//!
//! Every voice-state change for a user arrives as a `(previous, current)`
//! presence pair. The pair alone decides which edge of the per-user
//! `Disconnected`/`Connected` state machine fires:
//!
//! | previous | current | edge                          |
//! |----------|---------|-------------------------------|
//! | none     | none    | ignored                       |
//! | A        | A       | ignored (redundant update)    |
//! | none     | B       | join                          |
//! | A        | none    | leave                         |
//! | A        | B       | switch (close A, then open B) |
//!
//! Closing a session commits its elapsed time to the user's record and,
//! when the guild tracks factions and the member resolves to one, to that
//! faction's aggregate. The commit happens before anyone is notified, and
//! notification or hook failures never undo it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::collaborators::{FactionResolver, FeatureFlags, NoFactions, NoopNotifier, Notifier, SessionHook};
use crate::errors::{TrackerError, TrackerResult};
use crate::format::format_duration;
use crate::models::{
    ClosedSession, CloseReason, Faction, FactionAggregate, FactionCatalog, FactionKey, GuildId,
    GuildMember, OpenSession, SessionCommit, UserId, UserTimeRecord, VoicePresence,
};
use crate::rollup::DailyStandings;
use crate::settings::InMemorySettings;
use crate::stats::{TierTable, UserStatsView};

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Upper bound on a single faction lookup.
    pub resolve_timeout: Duration,
    /// Upper bound on each notifier or hook call.
    pub notify_timeout: Duration,
    pub tiers: TierTable,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(2),
            notify_timeout: Duration::from_secs(5),
            tiers: TierTable::default(),
        }
    }
}

/// Which edge of the state machine an event fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored,
    Opened(OpenSession),
    Closed(ClosedSession),
    Switched {
        closed: ClosedSession,
        opened: OpenSession,
    },
    /// A switch arrived for a user with no open session; a fresh session
    /// was opened without committing anything.
    Resynced(OpenSession),
}

#[derive(Debug, Default)]
struct Tables {
    open: HashMap<UserId, OpenSession>,
    users: HashMap<UserId, UserTimeRecord>,
    factions: HashMap<FactionKey, FactionAggregate>,
}

pub struct VoiceTracker {
    catalog: FactionCatalog,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    resolver: Arc<dyn FactionResolver>,
    flags: Arc<dyn FeatureFlags>,
    notifier: Arc<dyn Notifier>,
    hooks: Vec<Arc<dyn SessionHook>>,
    // Serializes whole events, collaborator calls included.
    events: Mutex<()>,
    tables: RwLock<Tables>,
}

pub struct VoiceTrackerBuilder {
    catalog: FactionCatalog,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    resolver: Arc<dyn FactionResolver>,
    flags: Arc<dyn FeatureFlags>,
    notifier: Arc<dyn Notifier>,
    hooks: Vec<Arc<dyn SessionHook>>,
}

impl VoiceTrackerBuilder {
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn FactionResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn flags(mut self, flags: Arc<dyn FeatureFlags>) -> Self {
        self.flags = flags;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn hook(mut self, hook: Arc<dyn SessionHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> VoiceTracker {
        let factions = self
            .catalog
            .iter()
            .map(|f| (f.key.clone(), FactionAggregate::default()))
            .collect();

        VoiceTracker {
            catalog: self.catalog,
            config: self.config,
            clock: self.clock,
            resolver: self.resolver,
            flags: self.flags,
            notifier: self.notifier,
            hooks: self.hooks,
            events: Mutex::new(()),
            tables: RwLock::new(Tables {
                factions,
                ..Tables::default()
            }),
        }
    }
}

impl VoiceTracker {
    /// Start building a tracker. Unset collaborators default to the system
    /// clock, no factions, all-enabled flags and a silent notifier.
    pub fn builder(catalog: FactionCatalog) -> VoiceTrackerBuilder {
        VoiceTrackerBuilder {
            catalog,
            config: TrackerConfig::default(),
            clock: Arc::new(SystemClock),
            resolver: Arc::new(NoFactions),
            flags: Arc::new(InMemorySettings::new()),
            notifier: Arc::new(NoopNotifier),
            hooks: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &FactionCatalog {
        &self.catalog
    }

    pub fn tiers(&self) -> &TierTable {
        &self.config.tiers
    }

    /// Feed one voice-state change into the tracker.
    ///
    /// Returns an error only when committing a closed session would break
    /// the accounting invariants. In that case nothing is written and the
    /// open session stays where it was.
    pub async fn on_voice_presence_changed(
        &self,
        member: &GuildMember,
        previous: Option<&VoicePresence>,
        current: Option<&VoicePresence>,
    ) -> TrackerResult<Transition> {
        let _event = self.events.lock().await;
        let now = self.clock.now();

        match (previous, current) {
            (None, None) => Ok(Transition::Ignored),
            (Some(from), Some(to)) if from.channel_id == to.channel_id => {
                debug!(
                    "Ignoring redundant voice update for {} in {}",
                    member.user_id, to.channel_name
                );
                Ok(Transition::Ignored)
            }
            (None, Some(to)) => Ok(self.join(member, to, now).await),
            (Some(from), None) => self.leave(member, from, now).await,
            (Some(from), Some(to)) => self.switch(member, from, to, now).await,
        }
    }

    async fn join(&self, member: &GuildMember, to: &VoicePresence, now: DateTime<Utc>) -> Transition {
        let opened = {
            let mut tables = self.tables.write().await;
            // The leave for any session still open here was missed.
            if let Some(stale) = tables.open.get(&member.user_id) {
                let e = TrackerError::Desync(format!(
                    "{} joined {} while a session in {} was still open; discarding it",
                    member.display_name, to.channel_name, stale.channel_name
                ));
                warn!("{}", e);
            }
            let session = OpenSession::start(to, now);
            tables.open.insert(member.user_id, session.clone());
            session
        };

        info!(
            "{} joined voice channel: {}",
            member.display_name, opened.channel_name
        );
        self.notify_opened(&opened, member).await;
        Transition::Opened(opened)
    }

    async fn leave(
        &self,
        member: &GuildMember,
        from: &VoicePresence,
        now: DateTime<Utc>,
    ) -> TrackerResult<Transition> {
        let Some(session) = self.open_session(member.user_id).await else {
            let e = TrackerError::Desync(format!(
                "{} left {} with no open session; nothing to commit",
                member.display_name, from.channel_name
            ));
            info!("{}", e);
            return Ok(Transition::Ignored);
        };

        let (closed, _) = self
            .close(member, session, now, CloseReason::Left, None)
            .await?;
        Ok(Transition::Closed(closed))
    }

    async fn switch(
        &self,
        member: &GuildMember,
        from: &VoicePresence,
        to: &VoicePresence,
        now: DateTime<Utc>,
    ) -> TrackerResult<Transition> {
        let Some(session) = self.open_session(member.user_id).await else {
            let e = TrackerError::Desync(format!(
                "{} switched {} -> {} with no open session; starting fresh",
                member.display_name, from.channel_name, to.channel_name
            ));
            warn!("{}", e);
            let opened = OpenSession::start(to, now);
            self.tables
                .write()
                .await
                .open
                .insert(member.user_id, opened.clone());
            self.notify_opened(&opened, member).await;
            return Ok(Transition::Resynced(opened));
        };

        let (closed, opened) = self
            .close(member, session, now, CloseReason::Switched, Some(to))
            .await?;
        match opened {
            Some(opened) => Ok(Transition::Switched { closed, opened }),
            None => Err(TrackerError::Commit(
                "switch closed a session without opening the next one".into(),
            )),
        }
    }

    async fn close(
        &self,
        member: &GuildMember,
        session: OpenSession,
        now: DateTime<Utc>,
        reason: CloseReason,
        next: Option<&VoicePresence>,
    ) -> TrackerResult<(ClosedSession, Option<OpenSession>)> {
        let elapsed_ms = session.elapsed_ms(now);
        let faction = self.resolve_faction(member, session.guild_id).await;

        let (new_total_ms, opened) = {
            let mut tables = self.tables.write().await;
            let new_total_ms = match commit(&mut tables, &session, elapsed_ms, faction.as_ref(), now) {
                Ok(total) => total,
                Err(e) => {
                    error!(
                        "Failed to commit {} of voice time for {}: {}",
                        format_duration(elapsed_ms),
                        member.user_id,
                        e
                    );
                    return Err(e);
                }
            };
            tables.open.remove(&member.user_id);
            let opened = next.map(|to| {
                let opened = OpenSession::start(to, now);
                tables.open.insert(member.user_id, opened.clone());
                opened
            });
            (new_total_ms, opened)
        };

        let closed = ClosedSession {
            user_id: session.user_id,
            guild_id: session.guild_id,
            channel_id: session.channel_id,
            channel_name: session.channel_name,
            started_at: session.start_time,
            ended_at: now,
            elapsed_ms,
            faction: faction.clone(),
            reason,
            next_channel_name: opened.as_ref().map(|o| o.channel_name.clone()),
        };

        match &opened {
            Some(opened) => info!(
                "{} switched: {} -> {} ({})",
                member.display_name,
                closed.channel_name,
                opened.channel_name,
                format_duration(elapsed_ms)
            ),
            None => info!(
                "{} left voice channel: {} ({})",
                member.display_name,
                closed.channel_name,
                format_duration(elapsed_ms)
            ),
        }

        self.bounded("notifier", self.notifier.session_closed(&closed, member))
            .await;
        if let Some(opened) = &opened {
            self.notify_opened(opened, member).await;
        }

        let commit = SessionCommit {
            user_id: member.user_id,
            guild_id: closed.guild_id,
            elapsed_ms,
            new_total_ms,
            faction,
        };
        for hook in &self.hooks {
            self.bounded("session hook", hook.session_committed(&commit))
                .await;
        }

        Ok((closed, opened))
    }

    /// The member's faction at this instant, or `None` when the guild has
    /// faction tracking off, the lookup fails, or the key is not one of ours.
    async fn resolve_faction(&self, member: &GuildMember, guild_id: GuildId) -> Option<FactionKey> {
        if !self.flags.is_faction_tracking_enabled(guild_id).await {
            return None;
        }

        match timeout(self.config.resolve_timeout, self.resolver.resolve(member)).await {
            Ok(Ok(Some(key))) if !self.catalog.contains(&key) => {
                warn!(
                    "Faction lookup for {} returned {}, which is not in the catalogue",
                    member.user_id, key
                );
                None
            }
            Ok(Ok(faction)) => faction,
            Ok(Err(e)) => {
                warn!("Faction lookup for {} failed: {}", member.user_id, e);
                None
            }
            Err(_) => {
                let e = TrackerError::Timeout {
                    collaborator: "faction resolver",
                    after: self.config.resolve_timeout,
                };
                warn!("Faction lookup for {}: {}", member.user_id, e);
                None
            }
        }
    }

    async fn notify_opened(&self, session: &OpenSession, member: &GuildMember) {
        self.bounded("notifier", self.notifier.session_opened(session, member))
            .await;
    }

    /// Run a best-effort collaborator call; failures are logged and dropped.
    async fn bounded<F>(&self, collaborator: &'static str, call: F)
    where
        F: Future<Output = TrackerResult<()>>,
    {
        match timeout(self.config.notify_timeout, call).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("{} call failed: {}", collaborator, e),
            Err(_) => {
                let e = TrackerError::Timeout {
                    collaborator,
                    after: self.config.notify_timeout,
                };
                warn!("{}", e);
            }
        }
    }

    /// The user's record, or zeroed defaults for users never seen.
    pub async fn user_stats(&self, user_id: UserId) -> UserTimeRecord {
        self.tables
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn user_stats_view(&self, user_id: UserId) -> UserStatsView {
        UserStatsView::new(self.user_stats(user_id).await, &self.config.tiers)
    }

    /// Users ordered by total voice time, most first.
    pub async fn top_users(&self, limit: usize) -> Vec<(UserId, UserTimeRecord)> {
        let tables = self.tables.read().await;
        let mut users: Vec<_> = tables
            .users
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        users.sort_by(|a, b| b.1.total_time_ms.cmp(&a.1.total_time_ms).then(a.0.cmp(&b.0)));
        users.truncate(limit);
        users
    }

    /// Every catalogue faction with its current aggregate, in catalogue order.
    pub async fn faction_totals(&self) -> Vec<(Faction, FactionAggregate)> {
        let tables = self.tables.read().await;
        self.catalog
            .iter()
            .map(|f| (f.clone(), tables.factions.get(&f.key).copied().unwrap_or_default()))
            .collect()
    }

    pub async fn faction_total(&self, key: &FactionKey) -> Option<FactionAggregate> {
        self.tables.read().await.factions.get(key).copied()
    }

    pub async fn open_session(&self, user_id: UserId) -> Option<OpenSession> {
        self.tables.read().await.open.get(&user_id).cloned()
    }

    pub async fn open_session_count(&self) -> usize {
        self.tables.read().await.open.len()
    }

    /// Zero every user's `today_time_ms` and every faction aggregate.
    /// Lifetime totals, session counts and longest sessions are kept.
    pub async fn reset_daily(&self) {
        let _event = self.events.lock().await;
        reset_daily_counters(&mut *self.tables.write().await);
        info!("Daily voice counters reset");
    }

    /// Snapshot today's faction totals and reset the daily counters in one
    /// step, so no commit can land between the two.
    pub async fn daily_rollup(&self) -> DailyStandings {
        let _event = self.events.lock().await;
        let mut tables = self.tables.write().await;
        let totals = self
            .catalog
            .iter()
            .map(|f| (f.clone(), tables.factions.get(&f.key).copied().unwrap_or_default()))
            .collect();
        let standings = DailyStandings::new(self.clock.now(), totals);
        reset_daily_counters(&mut tables);
        info!("Daily rollup taken and counters reset");
        standings
    }

    /// Administrative wipe of one user's record. Open sessions are untouched.
    pub async fn reset_user(&self, user_id: UserId) -> bool {
        let _event = self.events.lock().await;
        let removed = self.tables.write().await.users.remove(&user_id).is_some();
        if removed {
            info!("Voice record for {} reset by an administrator", user_id);
        }
        removed
    }
}

/// Add one closed session to the user's record and, if given, the faction
/// aggregate. All new values are computed before anything is written, so a
/// failure leaves the tables untouched.
fn commit(
    tables: &mut Tables,
    session: &OpenSession,
    elapsed_ms: u64,
    faction: Option<&FactionKey>,
    closed_at: DateTime<Utc>,
) -> TrackerResult<u64> {
    let record = tables
        .users
        .get(&session.user_id)
        .cloned()
        .unwrap_or_default()
        .with_session(elapsed_ms, closed_at)
        .ok_or_else(|| TrackerError::Commit(format!("user {} totals overflowed", session.user_id)))?;

    let faction_total = match faction {
        Some(key) => {
            let aggregate = tables.factions.get(key).copied().unwrap_or_default();
            let total = aggregate
                .total_time_ms
                .checked_add(elapsed_ms)
                .ok_or_else(|| TrackerError::Commit(format!("faction {} total overflowed", key)))?;
            Some((key.clone(), total))
        }
        None => None,
    };

    let new_total_ms = record.total_time_ms;
    tables.users.insert(session.user_id, record);
    if let Some((key, total_time_ms)) = faction_total {
        tables.factions.insert(key, FactionAggregate { total_time_ms });
    }
    Ok(new_total_ms)
}

fn reset_daily_counters(tables: &mut Tables) {
    for record in tables.users.values_mut() {
        record.today_time_ms = 0;
    }
    for aggregate in tables.factions.values_mut() {
        aggregate.total_time_ms = 0;
    }
}
