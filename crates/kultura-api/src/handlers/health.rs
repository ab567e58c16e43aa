use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup
    pub uptime: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub environment: String,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        environment: state.config.environment().to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs(),
    })
}

pub async fn api_info(State(state): State<Arc<AppState>>) -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: "KulturaView API is running",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment().to_string(),
    })
}

pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("API endpoint not found", "NOT_FOUND")),
    )
}
