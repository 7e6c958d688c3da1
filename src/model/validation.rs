//! # Student Validation
//!
//! Pure field checks run before any storage write.
//!
//! A single validator is built on first use and shared by every request;
//! it holds only the compiled email pattern and never mutates.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::student::StudentInput;

/// Upper bound for a plausible human age.
pub const MAX_AGE: i64 = 150;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static VALIDATOR: OnceLock<StudentValidator> = OnceLock::new();

/// Process-wide validator instance.
pub fn validator() -> &'static StudentValidator {
    VALIDATOR.get_or_init(StudentValidator::new)
}

/// One violated rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub constraint: &'static str,
}

impl FieldViolation {
    fn new(field: &'static str, constraint: &'static str) -> Self {
        Self { field, constraint }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constraint {
            "required" => write!(f, "field {} is required", self.field),
            "range" => write!(f, "field {} must be between 1 and {}", self.field, MAX_AGE),
            _ => write!(f, "field {} is invalid", self.field),
        }
    }
}

/// Every violation found on a candidate record, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_violations(.0))]
pub struct ValidationErrors(pub Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks `StudentInput` against the field rules.
pub struct StudentValidator {
    email: Regex,
}

impl StudentValidator {
    fn new() -> Self {
        Self {
            email: Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"),
        }
    }

    /// Validate a candidate record.
    pub fn validate(&self, input: &StudentInput) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();

        if input.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "required"));
        }

        if input.email.trim().is_empty() {
            violations.push(FieldViolation::new("email", "required"));
        } else if !self.email.is_match(&input.email) {
            violations.push(FieldViolation::new("email", "email"));
        }

        // Zero is the decoded value of a missing age.
        if input.age == 0 {
            violations.push(FieldViolation::new("age", "required"));
        } else if input.age < 0 || input.age > MAX_AGE {
            violations.push(FieldViolation::new("age", "range"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}
