use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use voicetrack_api::middleware::error_handling::AppError;

#[test]
fn test_bad_request_status() {
    assert_eq!(
        AppError::BadRequest("nope".to_string()).status(),
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_bad_request_body_carries_message() {
    let response = AppError::BadRequest("limit must be positive".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "limit must be positive" }));
}
