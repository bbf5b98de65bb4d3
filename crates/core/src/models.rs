pub mod discord;
pub mod faction;
pub mod session;

pub use discord::{ChannelId, GuildId, GuildMember, UserId, VoicePresence};
pub use faction::{Faction, FactionAggregate, FactionCatalog, FactionKey, NO_FACTION_COLOR};
pub use session::{ClosedSession, CloseReason, OpenSession, SessionCommit, UserTimeRecord};
