//! Exercise catalog entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An exercise in the user's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Muscle groups worked; treated as a set, order is not meaningful.
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
}

impl Exercise {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            muscle_groups: Vec::new(),
            equipment: None,
            notes: None,
            archived: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// True if the exercise works the given muscle group (case-insensitive).
    pub fn targets(&self, muscle_group: &str) -> bool {
        self.muscle_groups
            .iter()
            .any(|group| group.eq_ignore_ascii_case(muscle_group.trim()))
    }
}

/// Body of `POST /users/{userId}/exercises`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl CreateExerciseRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            muscle_groups: Vec::new(),
            equipment: None,
            notes: None,
            archived: false,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }
}
