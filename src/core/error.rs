// Centralized error handling for the roster service

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::api::ErrorResponse;

/// Failures reported by a student store adapter
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unreachable: {0}")]
    Transport(String),

    /// The store answered with an error status. `message` is the store's own
    /// text and is passed through to API callers unchanged.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Record not found")]
    NotFound,
}

/// Errors surfaced by the roster API
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    StoreFault(String),
}

impl From<StoreError> for RosterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => RosterError::NotFound("Student not found".to_string()),
            other => RosterError::StoreFault(other.to_string()),
        }
    }
}

impl From<ValidationError> for RosterError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingParameter(name) => RosterError::MissingParameter(name),
            ValidationError::InvalidFormat(detail) => RosterError::InvalidParameter(detail),
        }
    }
}

impl From<JsonRejection> for RosterError {
    fn from(rejection: JsonRejection) -> Self {
        RosterError::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for RosterError {
    fn from(rejection: QueryRejection) -> Self {
        RosterError::InvalidParameter(rejection.body_text())
    }
}

impl RosterError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RosterError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            RosterError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            RosterError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            RosterError::NotFound(_) => StatusCode::NOT_FOUND,
            RosterError::StoreFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter format: {0}")]
    InvalidFormat(String),
}

/// Student form could not produce a complete record
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Errors from the roster API client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Roster API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode roster API response: {0}")]
    Decode(String),

    #[error(transparent)]
    Form(#[from] FormError),
}
