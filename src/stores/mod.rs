//! Access to the `students` table.
//!
//! `StudentStore` is the seam between the API and whatever holds the rows.
//! `RestStore` talks to the hosted database over its REST interface;
//! `MemoryStore` keeps rows in process.

pub mod memory;
pub mod rest;

use crate::core::error::StoreError;
use crate::models::student::{Student, StudentId, StudentInput};
use async_trait::async_trait;

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Every row, in store order.
    async fn list(&self) -> Result<Vec<Student>, StoreError>;

    async fn get(&self, id: StudentId) -> Result<Option<Student>, StoreError>;

    /// Insert one row. Returns the inserted representation.
    async fn insert(&self, input: &StudentInput) -> Result<Vec<Student>, StoreError>;

    /// Overwrite every column of the row with `id`. Zero matching rows is not
    /// an error; the returned vector is empty.
    async fn update(&self, id: StudentId, input: &StudentInput) -> Result<Vec<Student>, StoreError>;

    /// Remove the row with `id`. Returns the removed rows.
    async fn delete(&self, id: StudentId) -> Result<Vec<Student>, StoreError>;
}
