use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use rstest::rstest;
use voicetrack_api::{
    handlers::stats::{
        get_faction_stats, get_leaderboard, get_user_stats, FactionStatsEntry, LeaderboardEntry,
        LeaderboardQuery, UserStatsResponse,
    },
    middleware::error_handling::AppError,
};
use voicetrack_core::{
    models::{FactionKey, UserId},
    stats::ActivityTier,
};

use crate::test_utils::TestContext;

const MINUTE_MS: u64 = 60_000;

#[tokio::test]
async fn test_user_stats_after_sessions() {
    let ctx = TestContext::new();
    ctx.session(5, None, 30).await;
    ctx.session(5, None, 90).await;

    let response = get_user_stats(State(ctx.state.clone()), Path(5)).await;

    assert_eq!(response.user_id, UserId(5));
    assert_eq!(response.stats.record.total_time_ms, 120 * MINUTE_MS);
    assert_eq!(response.stats.record.session_count, 2);
    assert_eq!(response.stats.record.longest_session_ms, 90 * MINUTE_MS);
    assert_eq!(response.stats.average_session_ms, 60 * MINUTE_MS);
    assert!(response.open_session.is_none());
}

#[tokio::test]
async fn test_unknown_user_gets_zeroed_stats() {
    let ctx = TestContext::new();

    let response = get_user_stats(State(ctx.state.clone()), Path(999)).await;

    assert_eq!(response.stats.record.total_time_ms, 0);
    assert_eq!(response.stats.average_session_ms, 0);
    assert_eq!(response.stats.tier, ActivityTier::Casual);
}

#[tokio::test]
async fn test_user_stats_show_open_session() {
    let ctx = TestContext::new();
    ctx.join(3).await;

    let response = get_user_stats(State(ctx.state.clone()), Path(3)).await;

    let session = response.open_session.as_ref().unwrap();
    assert_eq!(session.channel_name, "Lobby");
    assert_eq!(response.stats.record.session_count, 0);
}

#[tokio::test]
async fn test_faction_stats_in_catalogue_order() {
    let ctx = TestContext::new();
    ctx.session(1, Some(1), 90).await;
    ctx.session(2, Some(3), 20).await;
    ctx.session(3, None, 45).await;

    let entries = get_faction_stats(State(ctx.state.clone())).await.0;

    let keys: Vec<&FactionKey> = entries.iter().map(|entry| &entry.key).collect();
    assert_eq!(
        keys,
        vec![
            &FactionKey::from("Laughing_Meeks"),
            &FactionKey::from("Crimson_Unicorns"),
            &FactionKey::from("Special_Activities_Directive"),
        ]
    );
    assert_eq!(
        entries[0],
        FactionStatsEntry {
            key: FactionKey::from("Laughing_Meeks"),
            name: "Laughing Meeks".to_string(),
            color: 0xFF6B6B,
            today_time_ms: 90 * MINUTE_MS,
            points: 1,
            level: 1,
            activities: 1,
        }
    );
    assert_eq!(entries[1].today_time_ms, 0);
    assert_eq!(entries[1].activities, 0);
    assert_eq!(entries[2].today_time_ms, 20 * MINUTE_MS);
    assert_eq!(entries[2].points, 0);
}

#[tokio::test]
async fn test_leaderboard_ranks_by_total_time() {
    let ctx = TestContext::new();
    ctx.session(1, None, 10).await;
    ctx.session(2, None, 50).await;
    ctx.session(3, None, 30).await;

    let entries = get_leaderboard(
        State(ctx.state.clone()),
        Query(LeaderboardQuery { limit: Some(2) }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(
        entries,
        vec![
            LeaderboardEntry {
                rank: 1,
                user_id: UserId(2),
                total_time_ms: 50 * MINUTE_MS,
                session_count: 1,
            },
            LeaderboardEntry {
                rank: 2,
                user_id: UserId(3),
                total_time_ms: 30 * MINUTE_MS,
                session_count: 1,
            },
        ]
    );
}

#[rstest]
#[case(0)]
#[case(101)]
#[tokio::test]
async fn test_leaderboard_rejects_bad_limit(#[case] limit: usize) {
    let ctx = TestContext::new();

    let result = get_leaderboard(
        State(ctx.state.clone()),
        Query(LeaderboardQuery { limit: Some(limit) }),
    )
    .await;

    match result {
        Err(err @ AppError::BadRequest(_)) => assert_eq!(err.status(), StatusCode::BAD_REQUEST),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stats_routes_over_http() {
    let ctx = TestContext::new();
    ctx.session(8, Some(2), 60).await;
    let server = TestServer::new(voicetrack_api::router(ctx.state.clone())).unwrap();

    let user = server.get("/stats/users/8").await;
    user.assert_status_ok();
    let user: UserStatsResponse = user.json();
    assert_eq!(user.stats.record.total_time_ms, 60 * MINUTE_MS);

    let factions = server.get("/stats/factions").await;
    factions.assert_status_ok();
    let factions: Vec<FactionStatsEntry> = factions.json();
    assert_eq!(factions[1].today_time_ms, 60 * MINUTE_MS);
    assert_eq!(factions[1].points, 1);

    let board = server.get("/stats/leaderboard").await;
    board.assert_status_ok();
    let board: Vec<LeaderboardEntry> = board.json();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].user_id, UserId(8));

    let bad = server
        .get("/stats/leaderboard")
        .add_query_param("limit", 500)
        .await;
    assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        bad.json::<serde_json::Value>()["error"],
        "limit must be between 1 and 100"
    );
}
