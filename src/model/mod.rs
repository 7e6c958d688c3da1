//! # Student Model
//!
//! The single persisted entity and the field rules it must satisfy
//! before any write reaches storage.

mod student;
mod validation;

pub use student::{Student, StudentId, StudentInput};
pub use validation::{validator, FieldViolation, StudentValidator, ValidationErrors, MAX_AGE};
