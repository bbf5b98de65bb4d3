//! # Error Handling Middleware
//!
//! Maps request validation failures to HTTP status codes and a JSON
//! `{"error": "..."}` body, so every route fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error returned by fallible handlers.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(message) => message,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
