use serenity::{
    builder::CreateApplicationCommand,
    model::{application::command::CommandOptionType, channel::ChannelType, Permissions},
};

/// Create command for choosing the clock-in/clock-out channel
pub fn setclockchannel_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("setclockchannel")
        .description("Set the channel where voice time tracking messages are sent")
        .dm_permission(false)
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .create_option(|option| {
            option
                .name("channel")
                .description("The channel to send clock-in/out messages to")
                .kind(CommandOptionType::Channel)
                .channel_types(&[ChannelType::Text])
                .required(true)
        });

    command
}

/// Create command for turning faction attribution on or off
pub fn factiontracking_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("factiontracking")
        .description("Enable or disable faction time tracking for this server")
        .dm_permission(false)
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .create_option(|option| {
            option
                .name("enabled")
                .description("Whether voice time counts toward factions")
                .kind(CommandOptionType::Boolean)
                .required(true)
        });

    command
}

/// Create command for wiping a member's voice record
pub fn resettime_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("resettime")
        .description("Reset a member's voice time statistics")
        .dm_permission(false)
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .create_option(|option| {
            option
                .name("user")
                .description("The member whose time to reset")
                .kind(CommandOptionType::User)
                .required(true)
        });

    command
}
