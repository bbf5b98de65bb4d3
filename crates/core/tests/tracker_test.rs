use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use voicetrack_core::{
    clock::ManualClock,
    collaborators::{FactionResolver, Notifier},
    errors::{TrackerError, TrackerResult},
    mock::{MockFlags, MockHook, MockNotifier, MockResolver},
    models::{
        ClosedSession, CloseReason, FactionCatalog, FactionKey, GuildMember, OpenSession,
        UserId, UserTimeRecord, VoicePresence,
    },
    settings::InMemorySettings,
    tracker::{TrackerConfig, Transition, VoiceTracker},
};

const GUILD: u64 = 42;
const USER: u64 = 1001;

/// Resolver whose answer the test can change between events.
#[derive(Default)]
struct SwitchableResolver {
    faction: Mutex<Option<FactionKey>>,
    calls: Mutex<usize>,
}

impl SwitchableResolver {
    fn set(&self, key: Option<&str>) {
        *self.faction.lock().unwrap() = key.map(FactionKey::from);
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl FactionResolver for SwitchableResolver {
    async fn resolve(&self, _member: &GuildMember) -> TrackerResult<Option<FactionKey>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.faction.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    opened: Mutex<Vec<OpenSession>>,
    closed: Mutex<Vec<ClosedSession>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn session_opened(&self, session: &OpenSession, _member: &GuildMember) -> TrackerResult<()> {
        self.opened.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn session_closed(&self, session: &ClosedSession, _member: &GuildMember) -> TrackerResult<()> {
        self.closed.lock().unwrap().push(session.clone());
        Ok(())
    }
}

struct Harness {
    tracker: VoiceTracker,
    clock: Arc<ManualClock>,
    resolver: Arc<SwitchableResolver>,
    notifier: Arc<RecordingNotifier>,
    settings: Arc<InMemorySettings>,
    member: GuildMember,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::at_epoch());
        let resolver = Arc::new(SwitchableResolver::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let settings = Arc::new(InMemorySettings::new());
        let tracker = VoiceTracker::builder(FactionCatalog::default())
            .clock(clock.clone())
            .resolver(resolver.clone())
            .notifier(notifier.clone())
            .flags(settings.clone())
            .build();

        Self {
            tracker,
            clock,
            resolver,
            notifier,
            settings,
            member: GuildMember::new(USER, GUILD, "tester"),
        }
    }

    async fn at(
        &self,
        ms: i64,
        previous: Option<&VoicePresence>,
        current: Option<&VoicePresence>,
    ) -> TrackerResult<Transition> {
        self.clock.set_ms(ms);
        self.tracker
            .on_voice_presence_changed(&self.member, previous, current)
            .await
    }

    fn closed(&self) -> Vec<ClosedSession> {
        self.notifier.closed.lock().unwrap().clone()
    }
}

fn channel(id: u64, name: &str) -> VoicePresence {
    VoicePresence::new(USER, GUILD, id, name)
}

fn meeks() -> FactionKey {
    FactionKey::from("Laughing_Meeks")
}

fn directive() -> FactionKey {
    FactionKey::from("Special_Activities_Directive")
}

#[tokio::test]
async fn test_join_opens_session_without_committing() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    let transition = h.at(5_000, None, Some(&lobby)).await.unwrap();

    let session = h.tracker.open_session(UserId(USER)).await.unwrap();
    assert_eq!(transition, Transition::Opened(session.clone()));
    assert_eq!(session.channel_name, "Lobby");
    assert_eq!(session.start_time.timestamp_millis(), 5_000);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await, UserTimeRecord::default());
    assert_eq!(h.notifier.opened.lock().unwrap().len(), 1);
    assert_eq!(h.resolver.calls(), 0);
}

#[tokio::test]
async fn test_leave_commits_elapsed_time() {
    let h = Harness::new();
    h.resolver.set(Some("Laughing_Meeks"));
    let lobby = channel(1, "Lobby");

    h.at(0, None, Some(&lobby)).await.unwrap();
    let transition = h.at(90_000, Some(&lobby), None).await.unwrap();

    let Transition::Closed(closed) = transition else {
        panic!("expected a closed session, got {:?}", transition);
    };
    assert_eq!(closed.elapsed_ms, 90_000);
    assert_eq!(closed.reason, CloseReason::Left);
    assert_eq!(closed.faction, Some(meeks()));

    let stats = h.tracker.user_stats(UserId(USER)).await;
    assert_eq!(stats.total_time_ms, 90_000);
    assert_eq!(stats.session_count, 1);
    assert_eq!(stats.longest_session_ms, 90_000);
    assert_eq!(stats.today_time_ms, 90_000);
    assert_eq!(stats.last_active_at.map(|t| t.timestamp_millis()), Some(90_000));

    assert_eq!(h.tracker.faction_total(&meeks()).await.unwrap().total_time_ms, 90_000);
    assert!(h.tracker.open_session(UserId(USER)).await.is_none());
    assert_eq!(h.closed(), vec![closed]);
}

#[tokio::test]
async fn test_join_switch_leave_scenario() {
    let h = Harness::new();
    let a = channel(1, "Channel A");
    let b = channel(2, "Channel B");

    h.at(0, None, Some(&a)).await.unwrap();

    h.resolver.set(Some("Laughing_Meeks"));
    let switched = h.at(600_000, Some(&a), Some(&b)).await.unwrap();
    let Transition::Switched { closed, opened } = switched else {
        panic!("expected a switch, got {:?}", switched);
    };
    assert_eq!(closed.elapsed_ms, 600_000);
    assert_eq!(closed.reason, CloseReason::Switched);
    assert_eq!(closed.next_channel_name.as_deref(), Some("Channel B"));
    assert_eq!(opened.channel_name, "Channel B");
    assert_eq!(opened.start_time.timestamp_millis(), 600_000);

    h.resolver.set(Some("Special_Activities_Directive"));
    h.at(1_800_000, Some(&b), None).await.unwrap();

    let stats = h.tracker.user_stats(UserId(USER)).await;
    assert_eq!(stats.total_time_ms, 1_800_000);
    assert_eq!(stats.session_count, 2);
    assert_eq!(stats.longest_session_ms, 1_200_000);

    let elapsed: Vec<u64> = h.closed().iter().map(|c| c.elapsed_ms).collect();
    assert_eq!(elapsed, vec![600_000, 1_200_000]);
    assert_eq!(h.tracker.faction_total(&meeks()).await.unwrap().total_time_ms, 600_000);
    assert_eq!(
        h.tracker.faction_total(&directive()).await.unwrap().total_time_ms,
        1_200_000
    );
}

#[tokio::test]
async fn test_faction_resolved_at_close_not_open() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    h.resolver.set(Some("Laughing_Meeks"));
    h.at(0, None, Some(&lobby)).await.unwrap();
    h.resolver.set(Some("Special_Activities_Directive"));
    h.at(3_600_000, Some(&lobby), None).await.unwrap();

    assert_eq!(h.tracker.faction_total(&meeks()).await.unwrap().total_time_ms, 0);
    assert_eq!(
        h.tracker.faction_total(&directive()).await.unwrap().total_time_ms,
        3_600_000
    );
}

#[tokio::test]
async fn test_switch_produces_exactly_one_commit_and_one_open_session() {
    let h = Harness::new();
    let a = channel(1, "A");
    let b = channel(2, "B");

    h.at(0, None, Some(&a)).await.unwrap();
    h.at(1_000, Some(&a), Some(&b)).await.unwrap();

    assert_eq!(h.closed().len(), 1);
    assert_eq!(h.tracker.open_session_count().await, 1);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await.session_count, 1);
    assert_eq!(h.tracker.open_session(UserId(USER)).await.unwrap().channel_name, "B");
}

#[tokio::test]
async fn test_redundant_updates_never_mutate_aggregates() {
    let h = Harness::new();
    h.resolver.set(Some("Laughing_Meeks"));
    let lobby = channel(1, "Lobby");

    assert_eq!(h.at(0, None, None).await.unwrap(), Transition::Ignored);
    h.at(0, None, Some(&lobby)).await.unwrap();
    let before = h.tracker.user_stats(UserId(USER)).await;

    assert_eq!(
        h.at(50_000, Some(&lobby), Some(&lobby)).await.unwrap(),
        Transition::Ignored
    );

    assert_eq!(h.tracker.user_stats(UserId(USER)).await, before);
    assert_eq!(h.tracker.faction_total(&meeks()).await.unwrap().total_time_ms, 0);
    assert_eq!(
        h.tracker.open_session(UserId(USER)).await.unwrap().start_time.timestamp_millis(),
        0
    );
    assert!(h.closed().is_empty());
}

#[tokio::test]
async fn test_rejoin_same_channel_after_missed_leave_restarts_session() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    h.at(0, None, Some(&lobby)).await.unwrap();
    // The leave at some point in the next hour never arrived.
    let transition = h.at(3_600_000, None, Some(&lobby)).await.unwrap();

    assert!(matches!(transition, Transition::Opened(ref s) if s.start_time.timestamp_millis() == 3_600_000));
    assert_eq!(h.tracker.user_stats(UserId(USER)).await, UserTimeRecord::default());
    assert!(h.closed().is_empty());

    h.at(3_660_000, Some(&lobby), None).await.unwrap();
    let record = h.tracker.user_stats(UserId(USER)).await;
    assert_eq!(record.total_time_ms, 60_000);
    assert_eq!(record.session_count, 1);
}

#[tokio::test]
async fn test_leave_without_session_is_a_noop() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    let transition = h.at(10_000, Some(&lobby), None).await.unwrap();

    assert_eq!(transition, Transition::Ignored);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await, UserTimeRecord::default());
    assert_eq!(h.tracker.open_session_count().await, 0);
    assert!(h.closed().is_empty());
}

#[tokio::test]
async fn test_switch_without_session_resyncs() {
    let h = Harness::new();
    let a = channel(1, "A");
    let b = channel(2, "B");

    let transition = h.at(10_000, Some(&a), Some(&b)).await.unwrap();

    let Transition::Resynced(opened) = transition else {
        panic!("expected a resync, got {:?}", transition);
    };
    assert_eq!(opened.channel_name, "B");
    assert_eq!(opened.start_time.timestamp_millis(), 10_000);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await, UserTimeRecord::default());
    assert!(h.closed().is_empty());

    h.at(40_000, Some(&b), None).await.unwrap();
    assert_eq!(h.tracker.user_stats(UserId(USER)).await.total_time_ms, 30_000);
}

#[tokio::test]
async fn test_join_into_other_channel_discards_stale_session() {
    let h = Harness::new();
    let a = channel(1, "A");
    let b = channel(2, "B");

    h.at(0, None, Some(&a)).await.unwrap();
    let transition = h.at(500_000, None, Some(&b)).await.unwrap();

    assert!(matches!(transition, Transition::Opened(ref s) if s.channel_name == "B"));
    assert_eq!(h.tracker.user_stats(UserId(USER)).await, UserTimeRecord::default());
    assert_eq!(
        h.tracker.open_session(UserId(USER)).await.unwrap().start_time.timestamp_millis(),
        500_000
    );
}

#[tokio::test]
async fn test_clock_regression_never_produces_negative_time() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    h.at(100_000, None, Some(&lobby)).await.unwrap();
    h.at(40_000, Some(&lobby), None).await.unwrap();

    let stats = h.tracker.user_stats(UserId(USER)).await;
    assert_eq!(stats.total_time_ms, 0);
    assert_eq!(stats.session_count, 1);
}

#[tokio::test]
async fn test_totals_equal_sum_of_closed_sessions() {
    let h = Harness::new();
    let channels = [channel(1, "A"), channel(2, "B"), channel(3, "C")];
    let mut now = 0;
    let mut current: Option<&VoicePresence> = None;

    for (step, gap) in [12_000, 7_500, 300_000, 1_250, 64_000, 9_999, 45_000].iter().enumerate() {
        let next = if step % 4 == 3 { None } else { Some(&channels[step % 3]) };
        now += gap;
        h.at(now, current, next).await.unwrap();
        current = next;
    }
    if let Some(last) = current {
        h.at(now + 1_000, Some(last), None).await.unwrap();
    }

    let closed = h.closed();
    let stats = h.tracker.user_stats(UserId(USER)).await;
    assert_eq!(stats.total_time_ms, closed.iter().map(|c| c.elapsed_ms).sum::<u64>());
    assert_eq!(stats.session_count, closed.len() as u64);
    assert_eq!(
        stats.longest_session_ms,
        closed.iter().map(|c| c.elapsed_ms).max().unwrap_or(0)
    );
    assert!(stats.longest_session_ms <= stats.total_time_ms);
}

#[tokio::test]
async fn test_faction_tracking_disabled_still_counts_user_time() {
    let h = Harness::new();
    h.resolver.set(Some("Laughing_Meeks"));
    h.settings.set_faction_tracking(GUILD.into(), false).await;
    let lobby = channel(1, "Lobby");

    h.at(0, None, Some(&lobby)).await.unwrap();
    let transition = h.at(120_000, Some(&lobby), None).await.unwrap();

    let Transition::Closed(closed) = transition else {
        panic!("expected a closed session, got {:?}", transition);
    };
    assert_eq!(closed.faction, None);
    assert_eq!(h.resolver.calls(), 0);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await.total_time_ms, 120_000);
    assert_eq!(h.tracker.faction_total(&meeks()).await.unwrap().total_time_ms, 0);
}

#[tokio::test]
async fn test_stats_for_unknown_user_are_zero_and_side_effect_free() {
    let h = Harness::new();

    let stats = h.tracker.user_stats(UserId(9999)).await;

    assert_eq!(stats, UserTimeRecord::default());
    assert_eq!(h.tracker.open_session_count().await, 0);
    assert!(h.tracker.top_users(10).await.is_empty());
}

#[tokio::test]
async fn test_reset_daily_keeps_lifetime_totals() {
    let h = Harness::new();
    h.resolver.set(Some("Laughing_Meeks"));
    let lobby = channel(1, "Lobby");

    h.at(0, None, Some(&lobby)).await.unwrap();
    h.at(200_000, Some(&lobby), None).await.unwrap();
    h.tracker.reset_daily().await;

    let stats = h.tracker.user_stats(UserId(USER)).await;
    assert_eq!(stats.total_time_ms, 200_000);
    assert_eq!(stats.session_count, 1);
    assert_eq!(stats.longest_session_ms, 200_000);
    assert_eq!(stats.today_time_ms, 0);
    for (_, aggregate) in h.tracker.faction_totals().await {
        assert_eq!(aggregate.total_time_ms, 0);
    }
}

#[tokio::test]
async fn test_daily_rollup_snapshots_then_resets() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    h.resolver.set(Some("Special_Activities_Directive"));
    h.at(0, None, Some(&lobby)).await.unwrap();
    h.at(300_000, Some(&lobby), None).await.unwrap();

    let standings = h.tracker.daily_rollup().await;

    let leader = standings.leader().unwrap();
    assert_eq!(leader.faction.key, directive());
    assert_eq!(leader.total_time_ms, 300_000);
    assert_eq!(standings.factions.len(), 3);
    assert_eq!(h.tracker.faction_total(&directive()).await.unwrap().total_time_ms, 0);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await.today_time_ms, 0);
}

#[tokio::test]
async fn test_reset_user_removes_record_only() {
    let h = Harness::new();
    let lobby = channel(1, "Lobby");

    h.at(0, None, Some(&lobby)).await.unwrap();
    h.at(1_000, Some(&lobby), None).await.unwrap();
    h.at(2_000, None, Some(&lobby)).await.unwrap();

    assert!(h.tracker.reset_user(UserId(USER)).await);
    assert!(!h.tracker.reset_user(UserId(USER)).await);
    assert_eq!(h.tracker.user_stats(UserId(USER)).await, UserTimeRecord::default());
    assert!(h.tracker.open_session(UserId(USER)).await.is_some());
}

#[tokio::test]
async fn test_notifier_failure_does_not_roll_back_commit() {
    let clock = Arc::new(ManualClock::at_epoch());
    let mut notifier = MockNotifier::new();
    notifier.expect_session_opened().returning(|_, _| Ok(()));
    notifier.expect_session_closed().times(1).returning(|_, _| {
        Err(TrackerError::collaborator("notifier", eyre::eyre!("channel missing")))
    });
    let mut hook = MockHook::new();
    hook.expect_session_committed()
        .times(1)
        .withf(|commit| commit.new_total_ms == 30_000 && commit.elapsed_ms == 30_000)
        .returning(|_| Ok(()));

    let tracker = VoiceTracker::builder(FactionCatalog::default())
        .clock(clock.clone())
        .notifier(Arc::new(notifier))
        .hook(Arc::new(hook))
        .build();
    let member = GuildMember::new(USER, GUILD, "tester");
    let lobby = channel(1, "Lobby");

    tracker
        .on_voice_presence_changed(&member, None, Some(&lobby))
        .await
        .unwrap();
    clock.set_ms(30_000);
    let result = tracker
        .on_voice_presence_changed(&member, Some(&lobby), None)
        .await;

    assert!(matches!(result, Ok(Transition::Closed(_))));
    assert_eq!(tracker.user_stats(UserId(USER)).await.total_time_ms, 30_000);
}

struct HangingNotifier;

#[async_trait]
impl Notifier for HangingNotifier {
    async fn session_closed(&self, _session: &ClosedSession, _member: &GuildMember) -> TrackerResult<()> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

#[test_log::test(tokio::test)]
async fn test_hanging_notifier_is_bounded() {
    let clock = Arc::new(ManualClock::at_epoch());
    let tracker = VoiceTracker::builder(FactionCatalog::default())
        .clock(clock.clone())
        .notifier(Arc::new(HangingNotifier))
        .config(TrackerConfig {
            notify_timeout: Duration::from_millis(20),
            ..TrackerConfig::default()
        })
        .build();
    let member = GuildMember::new(USER, GUILD, "tester");
    let lobby = channel(1, "Lobby");

    tracker
        .on_voice_presence_changed(&member, None, Some(&lobby))
        .await
        .unwrap();
    clock.set_ms(10_000);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        tracker.on_voice_presence_changed(&member, Some(&lobby), None),
    )
    .await
    .expect("tracker should not hang on the notifier");

    assert!(result.is_ok());
    assert_eq!(tracker.user_stats(UserId(USER)).await.total_time_ms, 10_000);
}

#[tokio::test]
async fn test_resolver_failure_commits_without_faction() {
    let clock = Arc::new(ManualClock::at_epoch());
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .returning(|_| Err(TrackerError::collaborator("faction resolver", eyre::eyre!("cache cold"))));
    let mut flags = MockFlags::new();
    flags.expect_is_faction_tracking_enabled().return_const(true);

    let tracker = VoiceTracker::builder(FactionCatalog::default())
        .clock(clock.clone())
        .resolver(Arc::new(resolver))
        .flags(Arc::new(flags))
        .build();
    let member = GuildMember::new(USER, GUILD, "tester");
    let lobby = channel(1, "Lobby");

    tracker
        .on_voice_presence_changed(&member, None, Some(&lobby))
        .await
        .unwrap();
    clock.set_ms(45_000);
    let transition = tracker
        .on_voice_presence_changed(&member, Some(&lobby), None)
        .await
        .unwrap();

    let Transition::Closed(closed) = transition else {
        panic!("expected a closed session, got {:?}", transition);
    };
    assert_eq!(closed.faction, None);
    assert_eq!(tracker.user_stats(UserId(USER)).await.total_time_ms, 45_000);
    for (_, aggregate) in tracker.faction_totals().await {
        assert_eq!(aggregate.total_time_ms, 0);
    }
}

#[tokio::test]
async fn test_faction_outside_catalogue_commits_without_faction() {
    let h = Harness::new();
    h.resolver.set(Some("Renamed_Faction"));
    let a = channel(1, "A");
    let b = channel(2, "B");

    h.at(0, None, Some(&a)).await.unwrap();
    let transition = h.at(600_000, Some(&a), Some(&b)).await.unwrap();

    let Transition::Switched { closed, opened } = transition else {
        panic!("expected a switch, got {:?}", transition);
    };
    assert_eq!(closed.faction, None);
    assert_eq!(closed.elapsed_ms, 600_000);
    assert_eq!(opened.channel_name, "B");
    assert_eq!(h.tracker.user_stats(UserId(USER)).await.total_time_ms, 600_000);
    for (_, aggregate) in h.tracker.faction_totals().await {
        assert_eq!(aggregate.total_time_ms, 0);
    }

    h.at(18_600_000, None, Some(&a)).await.unwrap();
    h.at(18_660_000, Some(&a), None).await.unwrap();
    assert_eq!(h.tracker.user_stats(UserId(USER)).await.total_time_ms, 660_000);
}

#[tokio::test]
async fn test_failing_hook_does_not_block_commit_or_later_hooks() {
    let clock = Arc::new(ManualClock::at_epoch());
    let mut failing = MockHook::new();
    failing
        .expect_session_committed()
        .times(1)
        .returning(|_| Err(TrackerError::collaborator("achievements", eyre::eyre!("ledger locked"))));
    let mut second = MockHook::new();
    second
        .expect_session_committed()
        .times(1)
        .withf(|commit| commit.elapsed_ms == 20_000 && commit.new_total_ms == 20_000)
        .returning(|_| Ok(()));

    let tracker = VoiceTracker::builder(FactionCatalog::default())
        .clock(clock.clone())
        .hook(Arc::new(failing))
        .hook(Arc::new(second))
        .build();
    let member = GuildMember::new(USER, GUILD, "tester");
    let lobby = channel(1, "Lobby");

    tracker
        .on_voice_presence_changed(&member, None, Some(&lobby))
        .await
        .unwrap();
    clock.set_ms(20_000);
    let result = tracker
        .on_voice_presence_changed(&member, Some(&lobby), None)
        .await;

    assert!(matches!(result, Ok(Transition::Closed(_))));
    assert_eq!(tracker.user_stats(UserId(USER)).await.total_time_ms, 20_000);
    assert_eq!(tracker.open_session_count().await, 0);
}

#[tokio::test]
async fn test_concurrent_events_for_many_users_are_serialized() {
    let clock = Arc::new(ManualClock::at_epoch());
    let tracker = Arc::new(
        VoiceTracker::builder(FactionCatalog::default())
            .clock(clock.clone())
            .build(),
    );

    let mut joins = Vec::new();
    for user in 0..50u64 {
        let tracker = tracker.clone();
        joins.push(tokio::spawn(async move {
            let member = GuildMember::new(user, GUILD, format!("user-{}", user));
            let presence = VoicePresence::new(user, GUILD, 1u64, "Lobby");
            tracker
                .on_voice_presence_changed(&member, None, Some(&presence))
                .await
        }));
    }
    for join in joins {
        join.await.unwrap().unwrap();
    }
    assert_eq!(tracker.open_session_count().await, 50);

    clock.set_ms(1_000);
    let mut leaves = Vec::new();
    for user in 0..50u64 {
        let tracker = tracker.clone();
        leaves.push(tokio::spawn(async move {
            let member = GuildMember::new(user, GUILD, format!("user-{}", user));
            let presence = VoicePresence::new(user, GUILD, 1u64, "Lobby");
            tracker
                .on_voice_presence_changed(&member, Some(&presence), None)
                .await
        }));
    }
    for leave in leaves {
        leave.await.unwrap().unwrap();
    }

    assert_eq!(tracker.open_session_count().await, 0);
    let top = tracker.top_users(100).await;
    assert_eq!(top.len(), 50);
    assert!(top.iter().all(|(_, record)| record.total_time_ms == 1_000));
}
