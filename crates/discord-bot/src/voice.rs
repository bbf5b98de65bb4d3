//! Translation from serenity's voice and member types into tracker values.

use serenity::model::guild::Member;
use voicetrack_core::models::{GuildMember, OpenSession, VoicePresence};

/// Channel name for logs and cards; falls back to the raw id when the
/// channel is not cached.
pub fn channel_label(channel_id: u64, cached_name: Option<String>) -> String {
    cached_name.unwrap_or_else(|| format!("#{}", channel_id))
}

pub fn member_snapshot(member: &Member) -> GuildMember {
    GuildMember::new(
        member.user.id.0,
        member.guild_id.0,
        member.display_name().to_string(),
    )
    .with_roles(member.roles.iter().map(|role| role.0))
}

/// The presence an open session was started from.
///
/// Used as the "previous" side of an update when the gateway did not
/// deliver the user's old voice state.
pub fn presence_of(session: &OpenSession) -> VoicePresence {
    VoicePresence::new(
        session.user_id,
        session.guild_id,
        session.channel_id,
        session.channel_name.clone(),
    )
}
