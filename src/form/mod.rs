//! Create/edit form for a single student.
//!
//! Holds partially filled input and only hands out a `StudentInput` once
//! every field is present.

use crate::api::client::RosterClient;
use crate::core::error::{ClientError, FormError};
use crate::models::student::{Cohort, Course, Student, StudentId, StudentInput};
use crate::utils::time::{parse_date_joined, parse_last_login};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(StudentId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentForm {
    mode: FormMode,
    pub name: String,
    pub cohort: Option<Cohort>,
    pub course: Option<Course>,
    pub date_joined: Option<NaiveDate>,
    pub last_login: Option<NaiveDateTime>,
    pub status: bool,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentForm {
    /// Blank create form. Status starts as active.
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            cohort: None,
            course: None,
            date_joined: None,
            last_login: None,
            status: true,
        }
    }

    /// Edit form pre-populated from an existing record.
    pub fn from_student(student: &Student) -> Self {
        let fields = &student.fields;
        Self {
            mode: FormMode::Edit(student.id),
            name: fields.name.clone(),
            cohort: Some(fields.cohort),
            course: Some(fields.course),
            date_joined: Some(fields.date_joined),
            last_login: Some(fields.last_login),
            status: fields.status,
        }
    }

    /// Fetch the record `id` and pre-populate an edit form with it.
    pub async fn load(client: &RosterClient, id: StudentId) -> Result<Self, ClientError> {
        let student = client.get(id).await?;
        Ok(Self::from_student(&student))
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Apply a raw input change, as a form control reports it: `name` is the
    /// control name, `value` its string value.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let invalid = || FormError::InvalidValue {
            field: name.to_string(),
            value: value.to_string(),
        };

        match name {
            "name" => self.name = value.to_string(),
            "cohort" => {
                self.cohort = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                }
            }
            "course" => {
                self.course = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                }
            }
            "dateJoined" => {
                self.date_joined = if value.is_empty() {
                    None
                } else {
                    Some(parse_date_joined(value).ok_or_else(invalid)?)
                }
            }
            "lastLogin" => {
                self.last_login = if value.is_empty() {
                    None
                } else {
                    Some(parse_last_login(value).ok_or_else(invalid)?)
                }
            }
            "status" => {
                self.status = match value {
                    "true" => true,
                    "false" => false,
                    _ => return Err(invalid()),
                }
            }
            _ => return Err(invalid()),
        }

        Ok(())
    }

    /// Every field is required; the first missing one is reported.
    pub fn validate(&self) -> Result<StudentInput, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingField("name"));
        }

        Ok(StudentInput {
            name: self.name.clone(),
            cohort: self.cohort.ok_or(FormError::MissingField("cohort"))?,
            course: self.course.ok_or(FormError::MissingField("course"))?,
            date_joined: self.date_joined.ok_or(FormError::MissingField("dateJoined"))?,
            last_login: self.last_login.ok_or(FormError::MissingField("lastLogin"))?,
            status: self.status,
        })
    }

    /// Send the form as a single create or update call.
    ///
    /// On success the caller returns to the roster. On failure the error's
    /// display text is what the operator sees.
    pub async fn submit(&self, client: &RosterClient) -> Result<Vec<Student>, ClientError> {
        let fields = self.validate()?;

        let result = match self.mode {
            FormMode::Create => client.create(&fields).await,
            FormMode::Edit(id) => client.update(id, &fields).await,
        };

        match &result {
            Ok(_) => info!(mode = ?self.mode, name = %fields.name, "Student form submitted"),
            Err(e) => warn!(mode = ?self.mode, error = %e, "Student form submission failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::spawn_roster_server;
    use crate::models::student::fixtures::input;
    use crate::stores::StudentStore;

    fn filled_form() -> StudentForm {
        let mut form = StudentForm::new();
        form.set_field("name", "Kiran").unwrap();
        form.set_field("cohort", "AY 2024-2025").unwrap();
        form.set_field("course", "CBSE 9 English").unwrap();
        form.set_field("dateJoined", "2024-07-01").unwrap();
        form.set_field("lastLogin", "2024-07-02T10:20").unwrap();
        form
    }

    #[test]
    fn test_new_form_defaults_to_active() {
        let form = StudentForm::new();
        assert!(form.status);
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.validate(), Err(FormError::MissingField("name")));
    }

    #[test]
    fn test_each_field_is_required() {
        let form = filled_form();
        assert!(form.validate().is_ok());

        let mut missing = form.clone();
        missing.set_field("cohort", "").unwrap();
        assert_eq!(missing.validate(), Err(FormError::MissingField("cohort")));

        let mut missing = form.clone();
        missing.course = None;
        assert_eq!(missing.validate(), Err(FormError::MissingField("course")));

        let mut missing = form.clone();
        missing.date_joined = None;
        assert_eq!(missing.validate(), Err(FormError::MissingField("dateJoined")));

        let mut missing = form;
        missing.last_login = None;
        assert_eq!(missing.validate(), Err(FormError::MissingField("lastLogin")));
    }

    #[test]
    fn test_status_field_parses_booleans() {
        let mut form = filled_form();
        form.set_field("status", "false").unwrap();
        assert!(!form.validate().unwrap().status);

        assert!(matches!(
            form.set_field("status", "maybe"),
            Err(FormError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let mut form = StudentForm::new();
        assert!(form.set_field("course", "CBSE 8").is_err());
        assert!(form.set_field("dateJoined", "tomorrow").is_err());
        assert!(form.set_field("nickname", "K").is_err());
    }

    #[test]
    fn test_edit_form_prefills_from_student() {
        let student = Student::new(StudentId(8), input("Asha", Cohort::Ay2023_2024, Course::Math));
        let form = StudentForm::from_student(&student);

        assert_eq!(form.mode(), FormMode::Edit(StudentId(8)));
        assert_eq!(form.validate().unwrap(), student.fields);
    }

    #[tokio::test]
    async fn test_submit_create() {
        let (store, client) = spawn_roster_server().await;

        let ack = filled_form().submit(&client).await.unwrap();

        assert_eq!(ack.len(), 1);
        let stored = store.get(ack[0].id).await.unwrap().unwrap();
        assert_eq!(stored.fields.name, "Kiran");
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_sent() {
        let (store, client) = spawn_roster_server().await;
        let mut form = filled_form();
        form.name.clear();

        let err = form.submit(&client).await.unwrap_err();
        assert!(matches!(err, ClientError::Form(FormError::MissingField("name"))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_edit_and_submit() {
        let (store, client) = spawn_roster_server().await;
        let id = store.insert(&input("Asha", Cohort::Ay2023_2024, Course::Math)).await.unwrap()[0].id;

        let mut form = StudentForm::load(&client, id).await.unwrap();
        form.set_field("name", "Asha Rao").unwrap();
        form.set_field("status", "false").unwrap();
        form.submit(&client).await.unwrap();

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.fields.name, "Asha Rao");
        assert!(!stored.fields.status);
        assert_eq!(stored.fields.course, Course::Math);
    }

    #[tokio::test]
    async fn test_load_unknown_student_fails() {
        let (_, client) = spawn_roster_server().await;
        assert!(StudentForm::load(&client, StudentId(3)).await.is_err());
    }
}
