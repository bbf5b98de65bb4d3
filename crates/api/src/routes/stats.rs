use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/stats/users/:user_id", get(handlers::stats::get_user_stats))
        .route("/stats/factions", get(handlers::stats::get_faction_stats))
        .route("/stats/leaderboard", get(handlers::stats::get_leaderboard))
}
