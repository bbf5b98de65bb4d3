use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::collaborators::SessionHook;
use crate::errors::TrackerResult;
use crate::models::{SessionCommit, UserId};
use crate::stats::MS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub points: u32,
}

/// What unlocks an achievement from voice activity alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoiceRule {
    TotalHours(u64),
    SessionHours(u64),
}

const fn achievement(
    key: &'static str,
    name: &'static str,
    description: &'static str,
    emoji: &'static str,
    points: u32,
) -> Achievement {
    Achievement {
        key,
        name,
        description,
        emoji,
        points,
    }
}

pub const ACHIEVEMENTS: [Achievement; 10] = [
    achievement("first_hour", "First Hour", "Spend your first hour in voice chat", "🎯", 10),
    achievement("marathon", "Marathon Session", "Stay in voice for 3+ hours straight", "🏃", 25),
    achievement("dedicated", "Dedicated Member", "Accumulate 10+ total hours", "⭐", 50),
    achievement("veteran", "Faction Veteran", "Accumulate 50+ total hours", "🎖️", 100),
    achievement("legend", "Living Legend", "Accumulate 100+ total hours", "🏆", 200),
    achievement("battle_winner", "Battle Victor", "Win your first faction battle", "⚔️", 30),
    achievement("lucky_roller", "Lucky Roller", "Roll maximum on dice 3 times", "🎲", 20),
    achievement("social_butterfly", "Social Butterfly", "Use 20 different bot commands", "🦋", 40),
    achievement("early_bird", "Early Bird", "Be in voice chat at 6 AM", "🌅", 15),
    achievement("night_owl", "Night Owl", "Be in voice chat after midnight", "🦉", 15),
];

const VOICE_RULES: [(&str, VoiceRule); 5] = [
    ("first_hour", VoiceRule::TotalHours(1)),
    ("marathon", VoiceRule::SessionHours(3)),
    ("dedicated", VoiceRule::TotalHours(10)),
    ("veteran", VoiceRule::TotalHours(50)),
    ("legend", VoiceRule::TotalHours(100)),
];

pub fn find(key: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.key == key)
}

fn catalogue_position(key: &str) -> usize {
    ACHIEVEMENTS
        .iter()
        .position(|a| a.key == key)
        .unwrap_or(ACHIEVEMENTS.len())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    /// Unlocked keys in catalogue order.
    pub unlocked: Vec<String>,
    pub total_points: u32,
}

impl AchievementProgress {
    pub fn has(&self, key: &str) -> bool {
        self.unlocked.iter().any(|k| k == key)
    }

    pub fn completion_percent(&self) -> u32 {
        (self.unlocked.len() as u32 * 100 + ACHIEVEMENTS.len() as u32 / 2) / ACHIEVEMENTS.len() as u32
    }
}

/// Unlocks voice achievements as sessions are committed.
#[derive(Debug, Default)]
pub struct AchievementBook {
    users: RwLock<HashMap<UserId, AchievementProgress>>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn progress(&self, user_id: UserId) -> AchievementProgress {
        self.users
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Unlock every voice achievement the given figures qualify for.
    /// Returns the newly unlocked ones.
    pub async fn evaluate(
        &self,
        user_id: UserId,
        total_ms: u64,
        session_ms: u64,
    ) -> Vec<&'static Achievement> {
        let mut users = self.users.write().await;
        let progress = users.entry(user_id).or_default();

        let mut unlocked = Vec::new();
        for (key, rule) in VOICE_RULES {
            let earned = match rule {
                VoiceRule::TotalHours(h) => total_ms >= h * MS_PER_HOUR,
                VoiceRule::SessionHours(h) => session_ms >= h * MS_PER_HOUR,
            };
            if !earned || progress.has(key) {
                continue;
            }
            if let Some(achievement) = find(key) {
                progress.unlocked.push(key.to_string());
                progress.total_points += achievement.points;
                unlocked.push(achievement);
            }
        }
        if !unlocked.is_empty() {
            progress.unlocked.sort_by_key(|key| catalogue_position(key));
        }
        unlocked
    }

    pub async fn reset_user(&self, user_id: UserId) {
        self.users.write().await.remove(&user_id);
    }
}

#[async_trait]
impl SessionHook for AchievementBook {
    async fn session_committed(&self, commit: &SessionCommit) -> TrackerResult<()> {
        for achievement in self
            .evaluate(commit.user_id, commit.new_total_ms, commit.elapsed_ms)
            .await
        {
            info!(
                "🏆 User {} unlocked achievement {} (+{} pts)",
                commit.user_id, achievement.name, achievement.points
            );
        }
        Ok(())
    }
}
