use crate::utils::time::{date_joined_format, last_login_format};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned row identifier. Never reused or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StudentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(StudentId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

/// Academic-year grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cohort {
    #[serde(rename = "AY 2022-2023")]
    Ay2022_2023,
    #[serde(rename = "AY 2023-2024")]
    Ay2023_2024,
    #[serde(rename = "AY 2024-2025")]
    Ay2024_2025,
}

impl Cohort {
    pub const ALL: [Cohort; 3] = [Cohort::Ay2022_2023, Cohort::Ay2023_2024, Cohort::Ay2024_2025];

    pub fn label(self) -> &'static str {
        match self {
            Cohort::Ay2022_2023 => "AY 2022-2023",
            Cohort::Ay2023_2024 => "AY 2023-2024",
            Cohort::Ay2024_2025 => "AY 2024-2025",
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cohort {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cohort::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Enrolled course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "CBSE 9 Science")]
    Science,
    #[serde(rename = "CBSE 9 Math")]
    Math,
    #[serde(rename = "CBSE 9 English")]
    English,
}

impl Course {
    pub const ALL: [Course; 3] = [Course::Science, Course::Math, Course::English];

    pub fn label(self) -> &'static str {
        match self {
            Course::Science => "CBSE 9 Science",
            Course::Math => "CBSE 9 Math",
            Course::English => "CBSE 9 English",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Course {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Every mutable column of a student row. Used for inserts and
/// whole-record updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub name: String,
    pub cohort: Cohort,
    pub course: Course,
    #[serde(with = "date_joined_format")]
    pub date_joined: NaiveDate,
    #[serde(with = "last_login_format")]
    pub last_login: NaiveDateTime,
    /// true = active
    pub status: bool,
}

/// A row of the `students` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(flatten)]
    pub fields: StudentInput,
}

impl Student {
    pub fn new(id: StudentId, fields: StudentInput) -> Self {
        Self { id, fields }
    }
}
