use serde::{Deserialize, Serialize};

/// `?id=<id>` on GET and DELETE /api/students
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
}
