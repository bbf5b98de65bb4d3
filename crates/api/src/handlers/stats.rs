use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use voicetrack_core::{
    models::{FactionKey, OpenSession, UserId},
    stats::UserStatsView,
};

use crate::{middleware::error_handling::AppError, ApiState};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const MAX_LEADERBOARD_LIMIT: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub user_id: UserId,
    #[serde(flatten)]
    pub stats: UserStatsView,
    /// The session in progress, if the user is in voice right now.
    pub open_session: Option<OpenSession>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionStatsEntry {
    pub key: FactionKey,
    pub name: String,
    pub color: u32,
    /// Attributed voice time since the last daily reset.
    pub today_time_ms: u64,
    pub points: u64,
    pub level: u64,
    pub activities: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub total_time_ms: u64,
    pub session_count: u64,
}

/// Voice statistics for one user. Users never seen get zeroed figures.
#[axum::debug_handler]
pub async fn get_user_stats(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<u64>,
) -> Json<UserStatsResponse> {
    let user_id = UserId(user_id);
    let stats = state.tracker.user_stats_view(user_id).await;
    let open_session = state.tracker.open_session(user_id).await;

    Json(UserStatsResponse {
        user_id,
        stats,
        open_session,
    })
}

/// Every faction in catalogue order with today's time and its points.
#[axum::debug_handler]
pub async fn get_faction_stats(
    State(state): State<Arc<ApiState>>,
) -> Json<Vec<FactionStatsEntry>> {
    let mut entries = Vec::new();
    for (faction, aggregate) in state.tracker.faction_totals().await {
        let score = state.points.score(&faction.key).await.unwrap_or_default();
        entries.push(FactionStatsEntry {
            key: faction.key,
            name: faction.name,
            color: faction.color,
            today_time_ms: aggregate.total_time_ms,
            points: score.points,
            level: score.level(),
            activities: score.activities,
        });
    }

    Json(entries)
}

/// Users ranked by lifetime voice time.
#[axum::debug_handler]
pub async fn get_leaderboard(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    if limit == 0 || limit > MAX_LEADERBOARD_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LEADERBOARD_LIMIT
        )));
    }

    let entries = state
        .tracker
        .top_users(limit)
        .await
        .into_iter()
        .enumerate()
        .map(|(i, (user_id, record))| LeaderboardEntry {
            rank: i + 1,
            user_id,
            total_time_ms: record.total_time_ms,
            session_count: record.session_count,
        })
        .collect();

    Ok(Json(entries))
}
