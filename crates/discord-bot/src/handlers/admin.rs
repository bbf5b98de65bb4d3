use eyre::{eyre, Result};
use serenity::model::{
    application::interaction::application_command::ApplicationCommandInteraction,
    channel::ChannelType,
    id::ChannelId as SerenityChannelId,
};
use tracing::info;
use voicetrack_core::models::{ChannelId, UserId};

use crate::handlers::{command_guild, option_bool, option_id, reply_text, HandlerContext};

/// Handle the /setclockchannel command
pub async fn handle_setclockchannel_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let guild_id = command_guild(command)?;
    let channel_id = option_id(&command.data.options, "channel")
        .ok_or_else(|| eyre!("Missing channel parameter"))?;

    let kind = command
        .data
        .resolved
        .channels
        .get(&SerenityChannelId(channel_id))
        .map(|channel| channel.kind);
    if kind.is_some_and(|kind| kind != ChannelType::Text) {
        return reply_text(ctx, command, "❌ Please select a text channel!", true).await;
    }

    ctx.services
        .settings
        .set_clock_channel(guild_id, Some(ChannelId(channel_id)))
        .await;
    info!("Clock channel for guild {} set to {}", guild_id, channel_id);

    reply_text(
        ctx,
        command,
        &format!("✅ Voice time tracking messages will now be sent to <#{}>!", channel_id),
        true,
    )
    .await
}

/// Handle the /factiontracking command
pub async fn handle_factiontracking_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let guild_id = command_guild(command)?;
    let enabled = option_bool(&command.data.options, "enabled")
        .ok_or_else(|| eyre!("Missing enabled parameter"))?;

    ctx.services
        .settings
        .set_faction_tracking(guild_id, enabled)
        .await;
    info!("Faction tracking for guild {} set to {}", guild_id, enabled);

    let message = if enabled {
        "✅ Faction tracking enabled. Voice time now counts toward factions."
    } else {
        "⏸️ Faction tracking disabled. Voice time is still tracked per member."
    };
    reply_text(ctx, command, message, true).await
}

/// Handle the /resettime command
pub async fn handle_resettime_command(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let user_id = option_id(&command.data.options, "user")
        .map(UserId)
        .ok_or_else(|| eyre!("Missing user parameter"))?;

    let had_record = ctx.services.tracker.reset_user(user_id).await;
    ctx.services.achievements.reset_user(user_id).await;

    let message = if had_record {
        format!("🔄 Voice time for <@{}> has been reset.", user_id)
    } else {
        format!("<@{}> has no recorded voice time.", user_id)
    };
    reply_text(ctx, command, &message, true).await
}
