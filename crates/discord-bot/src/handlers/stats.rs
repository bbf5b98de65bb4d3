use eyre::Result;
use serenity::model::{
    application::interaction::application_command::ApplicationCommandInteraction,
    id::UserId as SerenityUserId,
};
use voicetrack_core::{
    collaborators::{FactionResolver, FeatureFlags},
    models::{GuildId, GuildMember},
};

use crate::cards;
use crate::handlers::{command_guild, option_id, reply_card, HandlerContext};
use crate::voice;

/// The member a stats command is about: the `user` option if given,
/// otherwise the caller.
pub fn target_member(command: &ApplicationCommandInteraction, guild_id: GuildId) -> GuildMember {
    match option_id(&command.data.options, "user") {
        Some(id) if id != command.user.id.0 => {
            let key = SerenityUserId(id);
            let resolved = &command.data.resolved;
            let partial = resolved.members.get(&key);
            let name = partial
                .and_then(|m| m.nick.clone())
                .or_else(|| resolved.users.get(&key).map(|u| u.name.clone()))
                .unwrap_or_else(|| id.to_string());
            let roles: Vec<u64> = partial
                .map(|m| m.roles.iter().map(|r| r.0).collect())
                .unwrap_or_default();
            GuildMember::new(id, guild_id, name).with_roles(roles)
        }
        _ => match &command.member {
            Some(member) => voice::member_snapshot(member),
            None => GuildMember::new(command.user.id.0, guild_id, command.user.name.clone()),
        },
    }
}

/// Handle the /mytime command
pub async fn handle_mytime_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let guild_id = command_guild(command)?;
    let member = target_member(command, guild_id);
    let services = &ctx.services;

    let faction = if services.settings.is_faction_tracking_enabled(guild_id).await {
        services.resolver.resolve(&member).await.ok().flatten()
    } else {
        None
    };
    let catalog = services.tracker.catalog();
    let view = services.tracker.user_stats_view(member.user_id).await;

    let card = cards::user_stats(
        &member.display_name,
        &view,
        &catalog.display_name(faction.as_ref()),
        catalog.color_of(faction.as_ref()),
    );
    reply_card(ctx, command, &card).await
}

/// Handle the /achievements command
pub async fn handle_achievements_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let member = target_member(command, command_guild(command)?);
    let progress = ctx.services.achievements.progress(member.user_id).await;

    reply_card(ctx, command, &cards::achievements(&member.display_name, &progress)).await
}

/// Handle the /factionpoints command
pub async fn handle_factionpoints_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let standings = ctx.services.points.standings().await;

    reply_card(ctx, command, &cards::faction_points(&standings)).await
}

/// Handle the /leaderboard command
pub async fn handle_leaderboard_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let tracker = &ctx.services.tracker;
    let top = tracker.top_users(10).await;
    let factions = tracker.faction_totals().await;

    reply_card(ctx, command, &cards::leaderboard(&top, &factions)).await
}
