use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use voicetrack_api::{config::ApiConfig, ApiState};
use voicetrack_discord_bot::{config::BotConfig, BotServices};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let api_config = ApiConfig::from_env()?;
    let bot_config = BotConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(api_config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting VoiceTrack");

    // The bot writes and the API reads the same tracker
    let services = BotServices::new(&bot_config)?;
    let state = Arc::new(ApiState {
        tracker: services.tracker.clone(),
        points: services.points.clone(),
    });

    tokio::try_join!(
        voicetrack_discord_bot::start_bot(bot_config, services),
        voicetrack_api::start_server(api_config, state),
    )?;

    Ok(())
}
