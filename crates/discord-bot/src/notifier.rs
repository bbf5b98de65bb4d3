use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use serenity::http::Http;
use serenity::model::id::{ChannelId as SerenityChannelId, UserId as SerenityUserId};
use tracing::{debug, warn};
use voicetrack_core::{
    collaborators::{FactionResolver, FeatureFlags, Notifier},
    errors::{TrackerError, TrackerResult},
    models::{ChannelId, CloseReason, ClosedSession, FactionCatalog, GuildMember, OpenSession, UserId},
    settings::InMemorySettings,
};

use crate::cards::{self, Card};
use crate::link::DiscordLink;
use crate::motivation;
use crate::resolver::RoleFactionResolver;

/// Post a card to a guild text channel.
pub async fn post_card(http: &Http, channel_id: ChannelId, card: &Card) -> Result<()> {
    SerenityChannelId(channel_id.0)
        .send_message(http, |m| m.embed(|e| card.apply(e)))
        .await?;
    Ok(())
}

/// Send a card to a user's DMs.
pub async fn dm_card(http: &Http, user_id: UserId, card: &Card) -> Result<()> {
    let channel = SerenityUserId(user_id.0).create_dm_channel(http).await?;
    channel
        .id
        .send_message(http, |m| m.embed(|e| card.apply(e)))
        .await?;
    Ok(())
}

/// Clock-in/clock-out embeds to the guild's clock channel and a
/// motivational DM when someone leaves voice.
pub struct DiscordNotifier {
    catalog: FactionCatalog,
    link: Arc<DiscordLink>,
    settings: Arc<InMemorySettings>,
    resolver: Arc<RoleFactionResolver>,
}

impl DiscordNotifier {
    pub fn new(
        catalog: FactionCatalog,
        link: Arc<DiscordLink>,
        settings: Arc<InMemorySettings>,
        resolver: Arc<RoleFactionResolver>,
    ) -> Self {
        Self {
            catalog,
            link,
            settings,
            resolver,
        }
    }

    fn http(&self) -> TrackerResult<&Arc<Http>> {
        self.link
            .http()
            .map_err(|e| TrackerError::collaborator("notifier", e))
    }

    async fn post(&self, channel_id: ChannelId, card: &Card) -> TrackerResult<()> {
        post_card(self.http()?, channel_id, card)
            .await
            .map_err(|e| TrackerError::collaborator("notifier", e))
    }

    async fn send_motivation(&self, closed: &ClosedSession, member: &GuildMember) -> TrackerResult<()> {
        let faction_name = closed
            .faction
            .as_ref()
            .and_then(|key| self.catalog.get(key))
            .map(|f| f.name.as_str());
        let message = motivation::pick_message(faction_name, &mut rand::thread_rng());
        let card = cards::motivation(
            faction_name.unwrap_or("No Faction"),
            self.catalog.color_of(closed.faction.as_ref()),
            closed.elapsed_ms,
            message,
        );

        dm_card(self.http()?, member.user_id, &card)
            .await
            .map_err(|e| TrackerError::collaborator("notifier", e))
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn session_opened(&self, session: &OpenSession, member: &GuildMember) -> TrackerResult<()> {
        let Some(channel_id) = self.settings.clock_channel(session.guild_id).await else {
            return Ok(());
        };

        // The tracker only resolves factions at close time; this lookup is for display.
        let faction = if self.settings.is_faction_tracking_enabled(session.guild_id).await {
            self.resolver.resolve(member).await.unwrap_or_else(|e| {
                debug!("No faction for clock-in card of {}: {}", member.user_id, e);
                None
            })
        } else {
            None
        };

        let card = cards::clock_in(member, session, &self.catalog.display_name(faction.as_ref()));
        self.post(channel_id, &card).await
    }

    async fn session_closed(&self, closed: &ClosedSession, member: &GuildMember) -> TrackerResult<()> {
        let posted = match self.settings.clock_channel(closed.guild_id).await {
            Some(channel_id) => {
                let faction_name = self.catalog.display_name(closed.faction.as_ref());
                let card = cards::session_closed(member, closed, &faction_name);
                self.post(channel_id, &card).await
            }
            None => Ok(()),
        };

        if closed.reason == CloseReason::Left
            && self.settings.is_faction_tracking_enabled(closed.guild_id).await
        {
            // Members with DMs closed are common; not worth failing the call over.
            if let Err(e) = self.send_motivation(closed, member).await {
                warn!("Could not DM {}: {}", member.display_name, e);
            }
        }

        posted
    }
}
