use serenity::builder::{CreateApplicationCommand, CreateApplicationCommands};

pub mod admin;
pub mod stats;

/// Every slash command the bot serves, in registration order.
pub fn all_commands() -> Vec<CreateApplicationCommand> {
    vec![
        stats::mytime_command(),
        stats::achievements_command(),
        stats::factionpoints_command(),
        stats::leaderboard_command(),
        admin::setclockchannel_command(),
        admin::factiontracking_command(),
        admin::resettime_command(),
    ]
}

/// Register all commands for the bot.
pub fn register_commands(commands: &mut CreateApplicationCommands) -> &mut CreateApplicationCommands {
    for definition in all_commands() {
        commands.create_application_command(|command| {
            *command = definition;
            command
        });
    }
    commands
}

/// The `name` a command builder will register under.
pub fn command_name(command: &CreateApplicationCommand) -> Option<&str> {
    command.0.get("name").and_then(|name| name.as_str())
}
