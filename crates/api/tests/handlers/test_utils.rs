use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use voicetrack_api::ApiState;
use voicetrack_core::{
    clock::ManualClock,
    collaborators::FactionResolver,
    errors::TrackerResult,
    models::{FactionCatalog, FactionKey, GuildMember, VoicePresence},
    points::FactionPoints,
    VoiceTracker,
};

pub const GUILD: u64 = 42;

/// Puts every member into the faction whose id is the member's first role.
struct RoleNameResolver;

#[async_trait]
impl FactionResolver for RoleNameResolver {
    async fn resolve(&self, member: &GuildMember) -> TrackerResult<Option<FactionKey>> {
        Ok(member.role_ids.first().map(|role| match role {
            1 => FactionKey::from("Laughing_Meeks"),
            2 => FactionKey::from("Crimson_Unicorns"),
            _ => FactionKey::from("Special_Activities_Directive"),
        }))
    }
}

pub struct TestContext {
    pub state: Arc<ApiState>,
    pub clock: Arc<ManualClock>,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::at_epoch());
        let catalog = FactionCatalog::default();
        let points = Arc::new(FactionPoints::new(catalog.clone()));
        let tracker = VoiceTracker::builder(catalog)
            .clock(clock.clone())
            .resolver(Arc::new(RoleNameResolver))
            .hook(points.clone())
            .build();

        Self {
            state: Arc::new(ApiState {
                tracker: Arc::new(tracker),
                points,
            }),
            clock,
        }
    }

    /// Join a channel, wait `minutes`, leave.
    pub async fn session(&self, user: u64, role: Option<u64>, minutes: i64) {
        let member = GuildMember::new(user, GUILD, format!("user-{}", user))
            .with_roles(role);
        let lobby = VoicePresence::new(user, GUILD, 7u64, "Lobby");

        self.state
            .tracker
            .on_voice_presence_changed(&member, None, Some(&lobby))
            .await
            .unwrap();
        self.clock.advance(Duration::minutes(minutes));
        self.state
            .tracker
            .on_voice_presence_changed(&member, Some(&lobby), None)
            .await
            .unwrap();
    }

    /// Join without leaving.
    pub async fn join(&self, user: u64) {
        let member = GuildMember::new(user, GUILD, format!("user-{}", user));
        let lobby = VoicePresence::new(user, GUILD, 7u64, "Lobby");
        self.state
            .tracker
            .on_voice_presence_changed(&member, None, Some(&lobby))
            .await
            .unwrap();
    }
}
