use crate::core::error::RosterError;
use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

pub async fn fallback_handler(uri: Uri) -> Response {
    RosterError::NotFound(format!(
        "No route for {}. Valid endpoints: /api/students, /health",
        uri.path()
    ))
    .into_response()
}
