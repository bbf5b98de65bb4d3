use std::sync::atomic::{AtomicBool, Ordering};

use serenity::{
    async_trait,
    model::{
        application::interaction::{
            application_command::{ApplicationCommandInteraction, CommandDataOption},
            Interaction, InteractionResponseType,
        },
        gateway::Ready,
        id::ChannelId as SerenityChannelId,
        voice::VoiceState,
    },
    prelude::*,
};
use tracing::{debug, error, info};
use voicetrack_core::models::{GuildId, GuildMember, UserId, VoicePresence};

pub mod admin;
pub mod stats;

use crate::cards::Card;
use crate::config::BotConfig;
use crate::{scheduler, voice, BotServices};

/// Main Discord handler that processes all events.
///
/// Voice-state updates feed the tracker; slash commands read and administer
/// it. The daily rollup task is spawned on the first `ready`.
pub struct Handler {
    config: BotConfig,
    services: BotServices,
    rollup_started: AtomicBool,
}

impl Handler {
    pub fn new(config: BotConfig, services: BotServices) -> Self {
        Self {
            config,
            services,
            rollup_started: AtomicBool::new(false),
        }
    }

    async fn presence(
        &self,
        ctx: &Context,
        user_id: u64,
        guild_id: u64,
        channel_id: SerenityChannelId,
    ) -> VoicePresence {
        let name = voice::channel_label(channel_id.0, channel_id.name(&ctx.cache).await);
        VoicePresence::new(user_id, guild_id, channel_id.0, name)
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Handle ready events (when bot connects to Discord)
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        // Guild registration shows up immediately; global registration can take a while.
        if let Some(test_guild_id) = self.config.test_guild_id {
            let guild_id = serenity::model::id::GuildId(test_guild_id);

            match guild_id
                .set_application_commands(&ctx.http, |commands| {
                    crate::commands::register_commands(commands)
                })
                .await
            {
                Ok(cmds) => info!(
                    "Guild commands registered successfully for {}! Total commands: {}",
                    test_guild_id,
                    cmds.len()
                ),
                Err(why) => error!("Error registering guild commands: {:?}", why),
            }
        }

        match serenity::model::application::command::Command::set_global_application_commands(
            &ctx.http,
            |commands| crate::commands::register_commands(commands),
        )
        .await
        {
            Ok(cmds) => {
                info!("Global commands registered successfully! Total commands: {}", cmds.len());
                for cmd in cmds {
                    debug!("Command registered: /{} - {}", cmd.name, cmd.description);
                }
            }
            Err(why) => error!("Error registering global commands: {:?}", why),
        }

        if !self.rollup_started.swap(true, Ordering::SeqCst) {
            tokio::spawn(scheduler::run_daily_rollup(
                self.services.clone(),
                self.config.rollup_hour_utc,
            ));
        }
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new
            .guild_id
            .or_else(|| old.as_ref().and_then(|state| state.guild_id))
        else {
            return;
        };
        if new.member.as_ref().is_some_and(|member| member.user.bot) {
            return;
        }

        let user_id = new.user_id.0;
        let member = match &new.member {
            Some(member) => voice::member_snapshot(member),
            None => GuildMember::new(user_id, guild_id.0, new.user_id.to_string()),
        };

        let previous = match &old {
            Some(state) => match state.channel_id {
                Some(channel_id) => Some(self.presence(&ctx, user_id, guild_id.0, channel_id).await),
                None => None,
            },
            // The cache missed the old state; trust the tracker's open session.
            None => self
                .services
                .tracker
                .open_session(UserId(user_id))
                .await
                .map(|session| voice::presence_of(&session)),
        };
        let current = match new.channel_id {
            Some(channel_id) => Some(self.presence(&ctx, user_id, guild_id.0, channel_id).await),
            None => None,
        };

        match self
            .services
            .tracker
            .on_voice_presence_changed(&member, previous.as_ref(), current.as_ref())
            .await
        {
            Ok(transition) => debug!("Voice update for {}: {:?}", member.display_name, transition),
            Err(e) => error!("Failed to record voice update for {}: {}", member.display_name, e),
        }
    }

    /// Handle interactions (slash commands)
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };
        info!("Received command: {}", command.data.name);

        let handler_ctx = HandlerContext {
            ctx: ctx.clone(),
            config: self.config.clone(),
            services: self.services.clone(),
        };

        let result = match command.data.name.as_str() {
            "mytime" => stats::handle_mytime_command(&handler_ctx, &command).await,
            "achievements" => stats::handle_achievements_command(&handler_ctx, &command).await,
            "factionpoints" => stats::handle_factionpoints_command(&handler_ctx, &command).await,
            "leaderboard" => stats::handle_leaderboard_command(&handler_ctx, &command).await,
            "setclockchannel" => admin::handle_setclockchannel_command(&handler_ctx, &command).await,
            "factiontracking" => admin::handle_factiontracking_command(&handler_ctx, &command).await,
            "resettime" => admin::handle_resettime_command(&handler_ctx, &command).await,
            _ => {
                error!("Unknown command: {}", command.data.name);
                Err(eyre::eyre!("Unknown command"))
            }
        };

        if let Err(e) = result {
            error!("Error handling command: {:?}", e);

            if let Err(why) = reply_text(&handler_ctx, &command, &format!("Error: {}", e), true).await {
                error!("Failed to send error response: {:?}", why);
            }
        }
    }
}

/// Shared context for command handlers.
pub struct HandlerContext {
    pub ctx: Context,
    pub config: BotConfig,
    pub services: BotServices,
}

pub async fn reply_card(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    card: &Card,
) -> eyre::Result<()> {
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.embed(|e| card.apply(e)))
        })
        .await?;
    Ok(())
}

pub async fn reply_text(
    ctx: &HandlerContext,
    command: &ApplicationCommandInteraction,
    content: &str,
    ephemeral: bool,
) -> eyre::Result<()> {
    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(content).ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

pub fn command_guild(command: &ApplicationCommandInteraction) -> eyre::Result<GuildId> {
    command
        .guild_id
        .map(|id| GuildId(id.0))
        .ok_or_else(|| eyre::eyre!("Command must be used in a server"))
}

/// A snowflake option (user, channel, role). Discord sends these as strings.
pub fn option_id(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse::<u64>().ok())
}

pub fn option_bool(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_bool())
}
