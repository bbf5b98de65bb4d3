use std::sync::Arc;

use async_trait::async_trait;
use eyre::eyre;
use serenity::model::id::GuildId as SerenityGuildId;
use voicetrack_core::{
    collaborators::FactionResolver,
    errors::{TrackerError, TrackerResult},
    models::{FactionCatalog, FactionKey, GuildMember},
};

use crate::link::DiscordLink;

/// Resolves a member's faction from the guild roles they hold.
///
/// A faction is matched by a role whose name equals the faction's display
/// name. When a member holds several faction roles the first faction in
/// catalogue order wins.
pub struct RoleFactionResolver {
    catalog: FactionCatalog,
    link: Arc<DiscordLink>,
}

impl RoleFactionResolver {
    pub fn new(catalog: FactionCatalog, link: Arc<DiscordLink>) -> Self {
        Self { catalog, link }
    }
}

#[async_trait]
impl FactionResolver for RoleFactionResolver {
    async fn resolve(&self, member: &GuildMember) -> TrackerResult<Option<FactionKey>> {
        let cache = self
            .link
            .cache()
            .map_err(|e| TrackerError::collaborator("faction resolver", e))?;
        let guild = cache
            .guild(SerenityGuildId(member.guild_id.0))
            .ok_or_else(|| {
                TrackerError::collaborator(
                    "faction resolver",
                    eyre!("guild {} is not cached", member.guild_id),
                )
            })?;

        let roles: Vec<(u64, &str)> = guild
            .roles
            .values()
            .map(|role| (role.id.0, role.name.as_str()))
            .collect();
        Ok(faction_for_roles(&self.catalog, &roles, member))
    }
}

/// The first catalogue faction whose role (by name) the member holds.
pub fn faction_for_roles(
    catalog: &FactionCatalog,
    guild_roles: &[(u64, &str)],
    member: &GuildMember,
) -> Option<FactionKey> {
    catalog
        .iter()
        .find(|faction| {
            guild_roles
                .iter()
                .any(|(id, name)| *name == faction.name && member.has_role(*id))
        })
        .map(|faction| faction.key.clone())
}
