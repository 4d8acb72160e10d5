// Student repository: CRUD intents in, store calls out

use crate::core::error::RosterError;
use crate::models::student::{Student, StudentId, StudentInput};
use crate::stores::StudentStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Thin access layer over a `StudentStore`.
///
/// Each method is exactly one store call. There are no retries, no
/// transactions and no caching; store failures become `RosterError::StoreFault`
/// carrying the store's message.
#[derive(Clone)]
pub struct StudentRepository {
    store: Arc<dyn StudentStore>,
}

impl StudentRepository {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Student>, RosterError> {
        let students = self.store.list().await.map_err(|e| {
            warn!(error = %e, "Failed to list students");
            RosterError::from(e)
        })?;
        debug!(count = students.len(), "Listed students");
        Ok(students)
    }

    pub async fn get(&self, id: StudentId) -> Result<Student, RosterError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RosterError::NotFound(format!("Student {} not found", id)))
    }

    pub async fn create(&self, fields: &StudentInput) -> Result<Vec<Student>, RosterError> {
        self.store.insert(fields).await.map_err(|e| {
            warn!(error = %e, "Store rejected insert");
            RosterError::from(e)
        })
    }

    /// Replace every field of the record `id`. An unknown `id` yields an empty
    /// acknowledgement, not an error.
    pub async fn update_all(
        &self,
        id: StudentId,
        fields: &StudentInput,
    ) -> Result<Vec<Student>, RosterError> {
        let updated = self.store.update(id, fields).await.map_err(|e| {
            warn!(student_id = %id, error = %e, "Store rejected update");
            RosterError::from(e)
        })?;

        if updated.is_empty() {
            debug!(student_id = %id, "Update matched no rows");
        }

        Ok(updated)
    }

    /// Delete by identifier. A missing identifier is rejected before the store
    /// is touched.
    pub async fn delete_by_id(&self, id: Option<StudentId>) -> Result<Vec<Student>, RosterError> {
        let id = id.ok_or_else(|| RosterError::MissingParameter("id".to_string()))?;

        self.store.delete(id).await.map_err(|e| {
            warn!(student_id = %id, error = %e, "Store rejected delete");
            RosterError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::models::student::fixtures::input;
    use crate::models::student::{Cohort, Course};
    use crate::stores::memory::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that fails every call and counts how often it was reached
    #[derive(Default)]
    struct FailingStore {
        calls: AtomicUsize,
    }

    impl FailingStore {
        fn fail(&self) -> StoreError {
            self.calls.fetch_add(1, Ordering::SeqCst);
            StoreError::Rejected {
                status: 503,
                message: "connection refused".to_string(),
            }
        }
    }

    #[async_trait]
    impl StudentStore for FailingStore {
        async fn list(&self) -> Result<Vec<Student>, StoreError> {
            Err(self.fail())
        }
        async fn get(&self, _id: StudentId) -> Result<Option<Student>, StoreError> {
            Err(self.fail())
        }
        async fn insert(&self, _input: &StudentInput) -> Result<Vec<Student>, StoreError> {
            Err(self.fail())
        }
        async fn update(&self, _id: StudentId, _input: &StudentInput) -> Result<Vec<Student>, StoreError> {
            Err(self.fail())
        }
        async fn delete(&self, _id: StudentId) -> Result<Vec<Student>, StoreError> {
            Err(self.fail())
        }
    }

    fn memory_repo() -> (Arc<MemoryStore>, StudentRepository) {
        let store = Arc::new(MemoryStore::new());
        (Arc::clone(&store), StudentRepository::new(store))
    }

    #[tokio::test]
    async fn test_create_then_list_has_one_more_record() {
        let (_, repo) = memory_repo();
        repo.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap();
        let before = repo.list_all().await.unwrap().len();

        let fields = input("B", Cohort::Ay2023_2024, Course::Science);
        let ack = repo.create(&fields).await.unwrap();

        let after = repo.list_all().await.unwrap();
        assert_eq!(after.len(), before + 1);
        let added = after.iter().find(|s| s.id == ack[0].id).unwrap();
        assert_eq!(added.fields, fields);
    }

    #[tokio::test]
    async fn test_delete_without_id_never_reaches_store() {
        let store = Arc::new(FailingStore::default());
        let repo = StudentRepository::new(store.clone());

        let result = repo.delete_by_id(None).await;

        assert!(matches!(result, Err(RosterError::MissingParameter(ref p)) if p == "id"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_others() {
        let (store, repo) = memory_repo();
        repo.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap();

        let ack = repo.delete_by_id(Some(StudentId(500))).await.unwrap();

        assert!(ack.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let (_, repo) = memory_repo();
        let id = repo.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await.unwrap()[0].id;

        let fields = input("A+", Cohort::Ay2024_2025, Course::English);
        repo.update_all(id, &fields).await.unwrap();
        let once = repo.list_all().await.unwrap();
        repo.update_all(id, &fields).await.unwrap();
        let twice = repo.list_all().await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(repo.get(id).await.unwrap().fields, fields);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (_, repo) = memory_repo();
        assert!(matches!(repo.get(StudentId(1)).await, Err(RosterError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_store_fault() {
        let repo = StudentRepository::new(Arc::new(FailingStore::default()));

        match repo.list_all().await {
            Err(RosterError::StoreFault(message)) => assert_eq!(message, "connection refused"),
            other => panic!("expected store fault, got {:?}", other),
        }
        assert!(matches!(
            repo.create(&input("A", Cohort::Ay2022_2023, Course::Math)).await,
            Err(RosterError::StoreFault(_))
        ));
    }
}
