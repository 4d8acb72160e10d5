use crate::core::error::StoreError;
use crate::models::student::{Student, StudentId, StudentInput};
use crate::stores::StudentStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory student table
pub struct MemoryStore {
    students: DashMap<StudentId, Student>,
    /// Next id to hand out. Only ever increases, so ids are never reused.
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            students: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> = self
            .students
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        students.sort_by_key(|s| s.id);
        Ok(students)
    }

    async fn get(&self, id: StudentId) -> Result<Option<Student>, StoreError> {
        Ok(self.students.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, input: &StudentInput) -> Result<Vec<Student>, StoreError> {
        let id = StudentId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let student = Student::new(id, input.clone());
        self.students.insert(id, student.clone());
        Ok(vec![student])
    }

    async fn update(&self, id: StudentId, input: &StudentInput) -> Result<Vec<Student>, StoreError> {
        match self.students.get_mut(&id) {
            Some(mut entry) => {
                entry.fields = input.clone();
                Ok(vec![entry.value().clone()])
            }
            None => Ok(Vec::new()),
        }
    }

    async fn delete(&self, id: StudentId) -> Result<Vec<Student>, StoreError> {
        Ok(self
            .students
            .remove(&id)
            .map(|(_, student)| vec![student])
            .unwrap_or_default())
    }
}
