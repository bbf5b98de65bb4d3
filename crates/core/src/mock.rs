use async_trait::async_trait;
use mockall::mock;

use crate::collaborators::{FactionResolver, FeatureFlags, Notifier, SessionHook};
use crate::errors::TrackerResult;
use crate::models::{ClosedSession, FactionKey, GuildId, GuildMember, OpenSession, SessionCommit};

// Mock collaborators for testing
mock! {
    pub Resolver {}

    #[async_trait]
    impl FactionResolver for Resolver {
        async fn resolve(&self, member: &GuildMember) -> TrackerResult<Option<FactionKey>>;
    }
}

mock! {
    pub Flags {}

    #[async_trait]
    impl FeatureFlags for Flags {
        async fn is_faction_tracking_enabled(&self, guild_id: GuildId) -> bool;
    }
}

mock! {
    pub Notifier {}

    #[async_trait]
    impl Notifier for Notifier {
        async fn session_opened(&self, session: &OpenSession, member: &GuildMember) -> TrackerResult<()>;
        async fn session_closed(&self, session: &ClosedSession, member: &GuildMember) -> TrackerResult<()>;
    }
}

mock! {
    pub Hook {}

    #[async_trait]
    impl SessionHook for Hook {
        async fn session_committed(&self, commit: &SessionCommit) -> TrackerResult<()>;
    }
}
