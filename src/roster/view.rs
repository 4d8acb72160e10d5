use crate::api::client::RosterClient;
use crate::core::error::ClientError;
use crate::models::student::{Cohort, Course, Student, StudentId};
use crate::utils::time::{format_date, format_date_time};
use tracing::{debug, info};

/// Filter criteria for the roster table. An empty search term and `None`
/// selections match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub search: String,
    pub cohort: Option<Cohort>,
    pub course: Option<Course>,
}

impl RosterFilter {
    /// Name or course label contains the search term (case-insensitive), and
    /// cohort and course equal the selections when set.
    pub fn matches(&self, student: &Student) -> bool {
        let term = self.search.to_lowercase();
        let fields = &student.fields;

        let matches_search = fields.name.to_lowercase().contains(&term)
            || fields.course.label().to_lowercase().contains(&term);
        let matches_cohort = self.cohort.map_or(true, |c| c == fields.cohort);
        let matches_course = self.course.map_or(true, |c| c == fields.course);

        matches_search && matches_cohort && matches_course
    }

    /// Matching students, original order kept.
    pub fn apply(&self, students: &[Student]) -> Vec<Student> {
        students
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect()
    }
}

/// One display row of the roster table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: StudentId,
    pub name: String,
    pub cohort: &'static str,
    pub course: &'static str,
    pub date_joined: String,
    pub last_login: String,
    pub status: &'static str,
}

impl From<&Student> for RosterRow {
    fn from(student: &Student) -> Self {
        let fields = &student.fields;
        Self {
            id: student.id,
            name: fields.name.clone(),
            cohort: fields.cohort.label(),
            course: fields.course.label(),
            date_joined: format_date(fields.date_joined),
            last_login: format_date_time(fields.last_login),
            status: if fields.status { "Active" } else { "Inactive" },
        }
    }
}

/// Roster dashboard state: the list fetched once plus the filter criteria.
///
/// The visible subset is recomputed from scratch after every change and never
/// triggers a fetch. Edits made elsewhere show up only after `reload`.
#[derive(Debug, Clone, Default)]
pub struct RosterView {
    students: Vec<Student>,
    filter: RosterFilter,
    visible: Vec<Student>,
}

impl RosterView {
    pub fn new(students: Vec<Student>) -> Self {
        let mut view = Self {
            students,
            ..Self::default()
        };
        view.refresh();
        view
    }

    /// Fetch the full roster once.
    pub async fn load(client: &RosterClient) -> Result<Self, ClientError> {
        let students = client.list().await?;
        info!(students = students.len(), "Roster loaded");
        Ok(Self::new(students))
    }

    /// Re-fetch the list, keeping the current filter.
    pub async fn reload(&mut self, client: &RosterClient) -> Result<(), ClientError> {
        let students = client.list().await?;
        self.set_students(students);
        Ok(())
    }

    /// Delete through the API, then drop the row locally without re-fetching.
    pub async fn delete(&mut self, client: &RosterClient, id: StudentId) -> Result<(), ClientError> {
        client.delete(id).await?;
        self.remove(id);
        Ok(())
    }

    fn refresh(&mut self) {
        self.visible = self.filter.apply(&self.students);
        debug!(
            total = self.students.len(),
            visible = self.visible.len(),
            "Roster filter applied"
        );
    }

    pub fn set_students(&mut self, students: Vec<Student>) {
        self.students = students;
        self.refresh();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.search = term.into();
        self.refresh();
    }

    pub fn set_cohort(&mut self, cohort: Option<Cohort>) {
        self.filter.cohort = cohort;
        self.refresh();
    }

    pub fn set_course(&mut self, course: Option<Course>) {
        self.filter.course = course;
        self.refresh();
    }

    pub fn remove(&mut self, id: StudentId) {
        self.students.retain(|s| s.id != id);
        self.visible.retain(|s| s.id != id);
    }

    pub fn find(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn visible(&self) -> &[Student] {
        &self.visible
    }

    pub fn rows(&self) -> Vec<RosterRow> {
        self.visible.iter().map(RosterRow::from).collect()
    }
}
