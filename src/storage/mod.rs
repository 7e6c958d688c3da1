//! # Student Storage Gateway
//!
//! The only component that issues SQL against the `students` table.
//!
//! # Contract
//!
//! - `create` inserts one row and returns the engine-assigned id
//! - `get_by_id` fails with `NotFound` when no row matches
//! - `get_all` returns rows in id order, empty when the table is empty
//! - `update_by_id` overwrites name/email/age and returns the re-read row
//! - `delete_by_id` reports whether a row was removed
//!
//! Every statement binds its inputs as parameters.

mod errors;
mod sqlite;

pub use errors::{StorageError, StorageResult};
pub use sqlite::SqliteStorage;

use crate::model::{Student, StudentId, StudentInput};

/// Storage contract for the student table.
///
/// Handlers only ever see this trait, so the engine behind it can be
/// swapped without touching request handling.
pub trait StudentStorage: Send + Sync {
    /// Insert a row and return its assigned id
    fn create(&self, input: &StudentInput) -> StorageResult<StudentId>;

    /// Fetch one row by id
    fn get_by_id(&self, id: StudentId) -> StorageResult<Student>;

    /// Fetch every row, ordered by id
    fn get_all(&self) -> StorageResult<Vec<Student>>;

    /// Overwrite all mutable fields of an existing row
    fn update_by_id(&self, id: StudentId, input: &StudentInput) -> StorageResult<Student>;

    /// Remove a row; `false` when nothing matched
    fn delete_by_id(&self, id: StudentId) -> StorageResult<bool>;
}
