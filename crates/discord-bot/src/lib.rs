use std::sync::Arc;

use eyre::Result;
use serenity::{prelude::GatewayIntents, Client};
use tracing::info;
use voicetrack_core::{
    achievements::AchievementBook, points::FactionPoints, settings::InMemorySettings, VoiceTracker,
};

pub mod cards;
pub mod commands;
pub mod config;
pub mod handlers;
pub mod link;
pub mod motivation;
pub mod notifier;
pub mod resolver;
pub mod scheduler;
pub mod voice;

use crate::config::BotConfig;
use crate::link::DiscordLink;
use crate::notifier::DiscordNotifier;
use crate::resolver::RoleFactionResolver;

/// Everything the bot shares between gateway events, slash commands and
/// the daily rollup task.
#[derive(Clone)]
pub struct BotServices {
    pub tracker: Arc<VoiceTracker>,
    pub settings: Arc<InMemorySettings>,
    pub points: Arc<FactionPoints>,
    pub achievements: Arc<AchievementBook>,
    pub resolver: Arc<RoleFactionResolver>,
    pub link: Arc<DiscordLink>,
}

impl BotServices {
    /// Build the tracker and its Discord-backed collaborators.
    ///
    /// The returned services are usable right away (the API serves stats from
    /// them) but nothing reaches Discord until [`start_bot`] connects the link.
    pub fn new(config: &BotConfig) -> Result<Self> {
        let catalog = config.catalog()?;
        let link = Arc::new(DiscordLink::new());
        let settings = Arc::new(InMemorySettings::new());
        let points = Arc::new(FactionPoints::new(catalog.clone()));
        let achievements = Arc::new(AchievementBook::new());
        let resolver = Arc::new(RoleFactionResolver::new(catalog.clone(), link.clone()));
        let notifier = Arc::new(DiscordNotifier::new(
            catalog.clone(),
            link.clone(),
            settings.clone(),
            resolver.clone(),
        ));

        let tracker = VoiceTracker::builder(catalog)
            .config(config.tracker_config())
            .resolver(resolver.clone())
            .flags(settings.clone())
            .notifier(notifier)
            .hook(points.clone())
            .hook(achievements.clone())
            .build();

        Ok(Self {
            tracker: Arc::new(tracker),
            settings,
            points,
            achievements,
            resolver,
            link,
        })
    }
}

/// Start the Discord bot over already-built services.
///
/// Runs until the gateway connection ends or fails.
pub async fn start_bot(config: BotConfig, services: BotServices) -> Result<()> {
    info!("Starting Discord bot");

    let handler = handlers::Handler::new(config.clone(), services.clone());
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(&config.token, intents)
        .application_id(config.application_id)
        .event_handler(handler)
        .await?;

    services.link.connect(
        client.cache_and_http.cache.clone(),
        client.cache_and_http.http.clone(),
    )?;

    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}
