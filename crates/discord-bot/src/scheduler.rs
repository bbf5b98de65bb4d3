use chrono::Utc;
use eyre::Result;
use tracing::{error, info, warn};
use voicetrack_core::{
    format::format_hours_minutes, points::FactionPoints, rollup::next_rollup_after,
    rollup::DailyStandings, VoiceTracker,
};

use crate::cards;
use crate::notifier::post_card;
use crate::BotServices;

/// Take the day's standings, reset the daily counters and award the
/// leading faction its bonus.
pub async fn close_day(tracker: &VoiceTracker, points: &FactionPoints) -> DailyStandings {
    let standings = tracker.daily_rollup().await;
    match standings.leader() {
        Some(leader) => {
            points.award_daily_leader(&leader.faction.key).await;
            info!(
                "🏆 {} led the day with {}",
                leader.faction.name,
                format_hours_minutes(leader.total_time_ms)
            );
        }
        None => info!("No faction voice time today; no daily bonus awarded"),
    }
    standings
}

/// Run one rollup and post the leaderboard to every configured clock channel.
pub async fn rollup_once(services: &BotServices) -> Result<DailyStandings> {
    let standings = close_day(&services.tracker, &services.points).await;
    let card = cards::daily_leaderboard(&standings);
    let http = services.link.http()?;

    for (guild_id, channel_id) in services.settings.clock_channels().await {
        if let Err(e) = post_card(http, channel_id, &card).await {
            warn!("Failed to post daily leaderboard to guild {}: {}", guild_id, e);
        }
    }
    info!("📊 Daily leaderboard sent");
    Ok(standings)
}

/// Sleep until the next rollup hour, roll up, repeat.
pub async fn run_daily_rollup(services: BotServices, hour_utc: u32) {
    loop {
        let now = Utc::now();
        let next = match next_rollup_after(now, hour_utc) {
            Ok(next) => next,
            Err(e) => {
                error!("Daily rollup disabled: {}", e);
                return;
            }
        };
        info!("📅 Next daily rollup at {}", next);
        tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

        if let Err(e) = rollup_once(&services).await {
            error!("Daily rollup failed: {:?}", e);
        }
    }
}
