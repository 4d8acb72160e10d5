use crate::core::error::ValidationError;
use crate::models::student::{Cohort, Course, StudentId, StudentInput};
use crate::utils::time::{parse_date_joined, parse_last_login};
use serde::Deserialize;

/// Identifier as it arrives from a client: forms send numbers, query strings
/// and some callers send strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

/// Request body for create and update. Every field is optional on the wire so
/// that a missing field is reported by name instead of as a parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub id: Option<RawId>,
    pub name: Option<String>,
    pub cohort: Option<String>,
    pub course: Option<String>,
    pub date_joined: Option<String>,
    pub last_login: Option<String>,
    pub status: Option<bool>,
}

impl StudentPayload {
    /// Validate a create body. Any `id` sent along is ignored; the store
    /// assigns it.
    pub fn into_input(self) -> Result<StudentInput, ValidationError> {
        let name = required("name", self.name)?;

        let cohort = required("cohort", self.cohort)?;
        let cohort = cohort
            .parse::<Cohort>()
            .map_err(|_| ValidationError::InvalidFormat(format!("cohort '{}'", cohort)))?;

        let course = required("course", self.course)?;
        let course = course
            .parse::<Course>()
            .map_err(|_| ValidationError::InvalidFormat(format!("course '{}'", course)))?;

        let date_joined = required("dateJoined", self.date_joined)?;
        let date_joined = parse_date_joined(&date_joined)
            .ok_or_else(|| ValidationError::InvalidFormat(format!("dateJoined '{}'", date_joined)))?;

        let last_login = required("lastLogin", self.last_login)?;
        let last_login = parse_last_login(&last_login)
            .ok_or_else(|| ValidationError::InvalidFormat(format!("lastLogin '{}'", last_login)))?;

        let status = self
            .status
            .ok_or_else(|| ValidationError::MissingParameter("status".to_string()))?;

        Ok(StudentInput {
            name,
            cohort,
            course,
            date_joined,
            last_login,
            status,
        })
    }

    /// Validate an update body: `id` first, then every data field.
    pub fn into_update(mut self) -> Result<(StudentId, StudentInput), ValidationError> {
        let id = parse_id(self.id.take())?;
        let input = self.into_input()?;
        Ok((id, input))
    }
}

/// Resolve an identifier that may be absent, numeric or textual.
pub fn parse_id(raw: Option<RawId>) -> Result<StudentId, ValidationError> {
    match raw {
        None => Err(ValidationError::MissingParameter("id".to_string())),
        Some(RawId::Number(n)) => Ok(StudentId(n)),
        Some(RawId::Text(s)) if s.trim().is_empty() => {
            Err(ValidationError::MissingParameter("id".to_string()))
        }
        Some(RawId::Text(s)) => s
            .parse::<StudentId>()
            .map_err(|_| ValidationError::InvalidFormat(format!("id '{}'", s))),
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingParameter(field.to_string())),
    }
}
