use serenity::{
    builder::CreateApplicationCommand,
    model::application::command::CommandOptionType,
};

/// Create command for a member's voice statistics
pub fn mytime_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("mytime")
        .description("View your personal voice channel time and statistics")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("user")
                .description("View another user's time (optional)")
                .kind(CommandOptionType::User)
                .required(false)
        });

    command
}

/// Create command for unlocked achievements
pub fn achievements_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("achievements")
        .description("View unlocked achievements and progress")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("user")
                .description("View another user's achievements (optional)")
                .kind(CommandOptionType::User)
                .required(false)
        });

    command
}

pub fn factionpoints_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("factionpoints")
        .description("View faction points and levels")
        .dm_permission(false);

    command
}

pub fn leaderboard_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("leaderboard")
        .description("Top members by voice time and today's faction standings")
        .dm_permission(false);

    command
}
