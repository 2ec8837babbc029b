//! Todo domain model.
//!
//! # Responsibility
//! - Define the `Todo` record and the `TodoRequest` write payload.
//! - Provide validation for user-supplied text fields.
//!
//! # Invariants
//! - `id` is assigned by the store and never reassigned.
//! - `name` and `description` must be non-blank before persistence.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a todo row.
pub type TodoId = i64;

/// Validation failures for todo text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyName,
    EmptyDescription,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Task name must not be empty."),
            Self::EmptyDescription => write!(f, "Task description must not be empty."),
        }
    }
}

impl Error for TodoValidationError {}

/// Write payload used by create and update flows.
///
/// Missing JSON fields deserialize to empty/zero values so that absent text
/// fails validation instead of deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoRequest {
    pub name: String,
    pub description: String,
    pub done: bool,
    pub priority: i32,
}

impl TodoRequest {
    /// Checks `name` then `description`, returning the first blank field.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_fields(&self.name, &self.description)
    }
}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// `None` until the store has persisted the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    pub name: String,
    pub description: String,
    pub done: bool,
    pub priority: i32,
}

impl Todo {
    /// Builds an unsaved record from a request; the store assigns `id`.
    pub fn draft(request: TodoRequest) -> Self {
        Self {
            id: None,
            name: request.name,
            description: request.description,
            done: request.done,
            priority: request.priority,
        }
    }

    /// Builds a replacement record that keeps an existing `id`.
    pub fn with_id(id: TodoId, request: TodoRequest) -> Self {
        Self {
            id: Some(id),
            ..Self::draft(request)
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_fields(&self.name, &self.description)
    }
}

fn validate_fields(name: &str, description: &str) -> Result<(), TodoValidationError> {
    if name.trim().is_empty() {
        return Err(TodoValidationError::EmptyName);
    }
    if description.trim().is_empty() {
        return Err(TodoValidationError::EmptyDescription);
    }
    Ok(())
}
