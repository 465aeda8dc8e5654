//! Column (task status lane) model.

use super::board::BoardId;
use super::{validate_rank, validate_title, ModelValidationError};
use crate::rank::Rank;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a column.
pub type ColumnId = Uuid;

/// A vertical lane of a board. Tasks reference their column as status.
///
/// Columns within one board are totally ordered by `rank`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable global ID.
    pub uuid: ColumnId,
    /// Owning board.
    pub board_uuid: BoardId,
    /// User-facing lane name.
    pub title: String,
    /// Display color, CSS notation.
    pub color: String,
    /// Opaque order key; interpreted only by the `rank` module.
    pub rank: String,
}

impl Column {
    /// Creates a column with a generated stable ID and the given order key.
    pub fn new(
        board_uuid: BoardId,
        title: impl Into<String>,
        color: impl Into<String>,
        rank: &Rank,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            board_uuid,
            title: title.into(),
            color: color.into(),
            rank: rank.to_string(),
        }
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_title("column", &self.title)?;
        validate_rank("column", &self.rank)
    }
}
