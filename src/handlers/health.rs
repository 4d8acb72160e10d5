use crate::models::api::HealthResponse;
use crate::utils::time::current_timestamp;
use axum::{http::StatusCode, response::IntoResponse, Json};

/// Health check handler
///
/// GET /health
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            timestamp: current_timestamp(),
        }),
    )
}
