//! Row (task group/swimlane) model.

use super::board::BoardId;
use super::{validate_rank, validate_title, ModelValidationError};
use crate::rank::Rank;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a row.
pub type RowId = Uuid;

/// A horizontal swimlane of a board. Tasks reference their row as group.
///
/// Rows within one board are totally ordered by `rank`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Stable global ID.
    pub uuid: RowId,
    /// Owning board.
    pub board_uuid: BoardId,
    /// User-facing group name.
    pub title: String,
    /// Optional display color, CSS notation.
    pub color: Option<String>,
    /// Opaque order key; interpreted only by the `rank` module.
    pub rank: String,
}

impl Row {
    /// Creates a row with a generated stable ID and the given order key.
    pub fn new(
        board_uuid: BoardId,
        title: impl Into<String>,
        color: Option<String>,
        rank: &Rank,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            board_uuid,
            title: title.into(),
            color,
            rank: rank.to_string(),
        }
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_title("row", &self.title)?;
        validate_rank("row", &self.rank)
    }
}
