//! Student record and inbound payload types.

use serde::{Deserialize, Serialize};

/// Identifier assigned by storage on insert.
pub type StudentId = i64;

/// A persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Client-supplied fields for create and update.
///
/// Missing fields decode to their empty value so the validator, not the
/// decoder, reports them as `required`. Any `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StudentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: i64,
}

impl StudentInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Strip surrounding whitespace from the text fields.
    ///
    /// Handlers call this before validating, so the value checked is the
    /// value stored.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age: self.age,
        }
    }

    /// Attach a storage-assigned id.
    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}
