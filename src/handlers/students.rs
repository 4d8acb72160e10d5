use crate::core::error::RosterError;
use crate::core::state::AppState;
use crate::models::api::IdQuery;
use crate::models::student::StudentId;
use crate::validation::params::{parse_id, RawId, StudentPayload};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::info;

/// Query `id` to a `StudentId`. `None` when the parameter is absent or blank.
fn query_id(query: IdQuery) -> Result<Option<StudentId>, RosterError> {
    match query.id {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(parse_id(Some(RawId::Text(raw)))?)),
        _ => Ok(None),
    }
}

/// List every student, or fetch one when `id` is given
///
/// GET /api/students
/// GET /api/students?id=<id>
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, RosterError> {
    let Query(query) = query?;
    if let Some(id) = query_id(query)? {
        let student = state.repository.get(id).await?;
        return Ok((StatusCode::OK, Json(student)).into_response());
    }

    let students = state.repository.list_all().await?;

    Ok((StatusCode::OK, Json(students)).into_response())
}

/// Create a student
///
/// POST /api/students
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> Result<Response, RosterError> {
    let Json(payload) = payload?;
    let fields = payload.into_input()?;

    let ack = state.repository.create(&fields).await?;

    info!(
        student_id = ?ack.first().map(|s| s.id.0),
        name = %fields.name,
        "Student created"
    );

    Ok((StatusCode::CREATED, Json(ack)).into_response())
}

/// Replace every field of a student
///
/// PUT /api/students  body: {id, name, cohort, course, dateJoined, lastLogin, status}
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StudentPayload>, JsonRejection>,
) -> Result<Response, RosterError> {
    let Json(payload) = payload?;
    let (id, fields) = payload.into_update()?;

    let ack = state.repository.update_all(id, &fields).await?;

    info!(student_id = %id, rows = ack.len(), "Student updated");

    Ok((StatusCode::OK, Json(ack)).into_response())
}

/// Delete a student
///
/// DELETE /api/students?id=<id>
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, RosterError> {
    let Query(query) = query?;
    let id = query_id(query)?;

    let ack = state.repository.delete_by_id(id).await?;

    info!(student_id = ?id.map(|id| id.0), rows = ack.len(), "Student deleted");

    Ok((StatusCode::OK, Json(ack)).into_response())
}
