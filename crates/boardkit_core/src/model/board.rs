//! Board aggregate root.

use super::{validate_title, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a board.
pub type BoardId = Uuid;

/// A kanban board: the grouping key for columns, rows and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Stable global ID.
    pub uuid: BoardId,
    /// User-facing board name.
    pub title: String,
    /// Optional free-form description.
    pub summary: Option<String>,
}

impl Board {
    /// Creates a board with a generated stable ID.
    pub fn new(title: impl Into<String>, summary: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, summary)
    }

    /// Creates a board with a caller-provided ID, for restore/import paths.
    pub fn with_id(uuid: BoardId, title: impl Into<String>, summary: Option<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
            summary,
        }
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_title("board", &self.title)
    }
}
