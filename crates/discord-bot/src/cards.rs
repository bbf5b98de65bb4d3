//! Embed content for everything the bot posts.
//!
//! A [`Card`] is plain data so it can be checked in tests; [`Card::apply`]
//! copies it onto a serenity embed builder at send time.

use chrono::{DateTime, Utc};
use serenity::builder::CreateEmbed;
use voicetrack_core::{
    achievements::{AchievementProgress, ACHIEVEMENTS},
    format::{format_duration, format_hours_minutes},
    models::{
        CloseReason, ClosedSession, Faction, FactionAggregate, GuildMember, OpenSession, UserId,
        UserTimeRecord,
    },
    points::{FactionStanding, DAILY_LEADER_BONUS},
    rollup::DailyStandings,
    stats::UserStatsView,
};

const JOIN_COLOR: u32 = 0x00FF00;
const LEAVE_COLOR: u32 = 0xFF0000;
const SWITCH_COLOR: u32 = 0xFFAA00;
const LEADERBOARD_COLOR: u32 = 0x3498DB;
const POINTS_COLOR: u32 = 0xFFD700;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    pub fields: Vec<CardField>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            fields: Vec::new(),
            footer: None,
            timestamp: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// The value of the first field with this name.
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn apply<'a>(&self, embed: &'a mut CreateEmbed) -> &'a mut CreateEmbed {
        embed.title(&self.title).color(self.color);
        if let Some(description) = &self.description {
            embed.description(description);
        }
        for field in &self.fields {
            embed.field(&field.name, &field.value, field.inline);
        }
        if let Some(footer) = &self.footer {
            embed.footer(|f| f.text(footer));
        }
        if let Some(at) = self.timestamp {
            embed.timestamp(at);
        }
        embed
    }
}

pub fn medal(rank: usize) -> &'static str {
    match rank {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "🏅",
    }
}

fn level_emoji(level: u64) -> &'static str {
    match level {
        50.. => "✨",
        20.. => "💫",
        10.. => "🌟",
        _ => "⭐",
    }
}

fn mention(user_id: UserId) -> String {
    format!("<@{}>", user_id)
}

pub fn clock_in(member: &GuildMember, session: &OpenSession, faction_name: &str) -> Card {
    Card::new("🟢 Voice Channel Join", JOIN_COLOR)
        .description(format!(
            "{} joined **{}**",
            mention(member.user_id),
            session.channel_name
        ))
        .field("👤 User", &member.display_name, true)
        .field("🔊 Channel", &session.channel_name, true)
        .field("👥 Faction", faction_name, true)
        .footer("Clock-in System")
        .timestamp(session.start_time)
}

/// Clock-out card for a leave, switch card for a switch.
pub fn session_closed(member: &GuildMember, closed: &ClosedSession, faction_name: &str) -> Card {
    let duration = format_duration(closed.elapsed_ms);
    match closed.reason {
        CloseReason::Left => Card::new("🔴 Voice Channel Leave", LEAVE_COLOR)
            .description(format!(
                "{} left **{}**",
                mention(member.user_id),
                closed.channel_name
            ))
            .field("👤 User", &member.display_name, true)
            .field("🔊 Channel", &closed.channel_name, true)
            .field("👥 Faction", faction_name, true)
            .field("⏱️ Session Duration", duration, false)
            .footer("Clock-out System")
            .timestamp(closed.ended_at),
        CloseReason::Switched => Card::new("🔄 Voice Channel Switch", SWITCH_COLOR)
            .description(format!("{} switched voice channels", mention(member.user_id)))
            .field("👤 User", &member.display_name, true)
            .field("👥 Faction", faction_name, true)
            .field("📤 Left Channel", &closed.channel_name, false)
            .field(
                "📥 Joined Channel",
                closed.next_channel_name.as_deref().unwrap_or("Unknown"),
                true,
            )
            .field("⏱️ Previous Session", duration, true)
            .footer("Channel Switch System")
            .timestamp(closed.ended_at),
    }
}

pub fn motivation(faction_name: &str, color: u32, elapsed_ms: u64, message: &str) -> Card {
    Card::new("🏆 Session Complete!", color)
        .description(message)
        .field("⏱️ Time Clocked", format_duration(elapsed_ms), true)
        .field("🏴 Faction", faction_name, true)
        .footer("Every minute counts for your faction's glory!")
        .timestamp(Utc::now())
}

pub fn user_stats(display_name: &str, view: &UserStatsView, faction_name: &str, color: u32) -> Card {
    let record = &view.record;
    let last_active = record
        .last_active_at
        .map(|at| format!("<t:{}:R>", at.timestamp()))
        .unwrap_or_else(|| "Never".to_string());

    Card::new(format!("⏱️ {}'s Time Statistics", display_name), color)
        .field("📊 Total Voice Time", format_hours_minutes(record.total_time_ms), true)
        .field("🎯 Sessions Completed", record.session_count.to_string(), true)
        .field("🏆 Longest Session", format_hours_minutes(record.longest_session_ms), true)
        .field("📅 Today's Time", format_hours_minutes(record.today_time_ms), true)
        .field("📈 Average Session", format_hours_minutes(view.average_session_ms), true)
        .field("🔥 Activity Level", view.tier.label(), true)
        .field("🏴 Faction", faction_name, true)
        .field("🕐 Last Active", last_active, true)
        .timestamp(Utc::now())
}

pub fn achievements(display_name: &str, progress: &AchievementProgress) -> Card {
    let unlocked = ACHIEVEMENTS
        .iter()
        .filter(|a| progress.has(a.key))
        .map(|a| format!("{} **{}** (+{} pts)\n{}", a.emoji, a.name, a.points, a.description))
        .collect::<Vec<_>>();
    let locked = ACHIEVEMENTS
        .iter()
        .filter(|a| !progress.has(a.key))
        .map(|a| format!("🔒 {}", a.name))
        .collect::<Vec<_>>();

    Card::new(format!("🏅 {}'s Achievements", display_name), POINTS_COLOR)
        .description(format!(
            "{}/{} unlocked ({}%) • {} points",
            progress.unlocked.len(),
            ACHIEVEMENTS.len(),
            progress.completion_percent(),
            progress.total_points
        ))
        .field("✅ Unlocked", non_empty(unlocked.join("\n\n"), "None yet"), false)
        .field("🔒 Locked", non_empty(locked.join("\n"), "Nothing left!"), false)
}

pub fn faction_points(standings: &[FactionStanding]) -> Card {
    let rankings = standings
        .iter()
        .enumerate()
        .map(|(rank, standing)| {
            let score = &standing.score;
            format!(
                "{} **{}**\n{} Level {} • {} points\n📈 Activities: {}",
                medal(rank),
                standing.faction.name,
                level_emoji(score.level()),
                score.level(),
                score.points,
                score.activities
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    Card::new("🏆 Faction Points & Achievements", POINTS_COLOR)
        .description("Compete for faction supremacy!")
        .field("🏴 Faction Rankings", non_empty(rankings, "No factions configured"), false)
        .field(
            "📊 How to Earn Points",
            format!(
                "🎯 Voice time: 1 pt/hour\n🏆 Daily #1: {} pts",
                DAILY_LEADER_BONUS
            ),
            false,
        )
        .timestamp(Utc::now())
}

pub fn leaderboard(top: &[(UserId, UserTimeRecord)], factions: &[(Faction, FactionAggregate)]) -> Card {
    let users = top
        .iter()
        .enumerate()
        .map(|(rank, (user_id, record))| {
            format!(
                "{} {} • {}",
                medal(rank),
                mention(*user_id),
                format_hours_minutes(record.total_time_ms)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut ranked: Vec<_> = factions.iter().collect();
    ranked.sort_by(|a, b| b.1.total_time_ms.cmp(&a.1.total_time_ms));
    let factions = ranked
        .iter()
        .enumerate()
        .map(|(rank, (faction, aggregate))| {
            format!(
                "{} **{}** • {}",
                medal(rank),
                faction.name,
                format_hours_minutes(aggregate.total_time_ms)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Card::new("📊 Voice Leaderboard", LEADERBOARD_COLOR)
        .field("👤 Top Members", non_empty(users, "Nobody has clocked any time yet"), false)
        .field("🏴 Factions Today", non_empty(factions, "No factions configured"), false)
        .timestamp(Utc::now())
}

pub fn daily_leaderboard(standings: &DailyStandings) -> Card {
    let card = Card::new("📊 Daily Faction Leaderboard", LEADERBOARD_COLOR)
        .description("Here are today's faction activity standings!")
        .footer("Daily Leaderboard • Updates every 24 hours")
        .timestamp(standings.taken_at);

    standings
        .factions
        .iter()
        .enumerate()
        .fold(card, |card, (rank, day)| {
            card.field(
                format!("{} {}", medal(rank), day.faction.name),
                format!("⏱️ **{}**", format_hours_minutes(day.total_time_ms)),
                true,
            )
        })
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
