use axum::extract::State;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use voicetrack_api::handlers::health::{health_check, version, HealthResponse};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_counts_open_sessions() {
    let ctx = TestContext::new();
    ctx.join(1).await;
    ctx.join(2).await;

    let response = health_check(State(ctx.state.clone())).await;

    assert_eq!(response.status, "ok");
    assert_eq!(response.open_sessions, 2);
}

#[tokio::test]
async fn test_version_reports_package_version() {
    let response = version().await;
    assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_route() {
    let ctx = TestContext::new();
    let server = TestServer::new(voicetrack_api::router(ctx.state.clone())).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "ok");
    assert_eq!(body.open_sessions, 0);
}
