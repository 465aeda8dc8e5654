//! Task (card) model.
//!
//! A task lives in one cell of its board: the intersection of a column
//! (status) and a row (group). Tasks within a cell are totally ordered by
//! `rank`.

use super::board::BoardId;
use super::column::ColumnId;
use super::row::RowId;
use super::{validate_rank, validate_title, ModelValidationError};
use crate::rank::Rank;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Task urgency marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID.
    pub uuid: TaskId,
    /// Owning board.
    pub board_uuid: BoardId,
    /// Status: the column this task sits in.
    pub column_uuid: ColumnId,
    /// Group: the row this task sits in.
    pub row_uuid: RowId,
    /// User-facing card text.
    pub title: String,
    /// Opaque order key within the (column, row) cell.
    pub rank: String,
    pub priority: Priority,
    /// Unix epoch milliseconds. Should be <= `due_date` when both are set.
    pub start_date: Option<i64>,
    /// Unix epoch milliseconds.
    pub due_date: Option<i64>,
}

impl Task {
    /// Creates a task with a generated stable ID and default priority.
    pub fn new(
        board_uuid: BoardId,
        column_uuid: ColumnId,
        row_uuid: RowId,
        title: impl Into<String>,
        rank: &Rank,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            board_uuid,
            column_uuid,
            row_uuid,
            title: title.into(),
            rank: rank.to_string(),
            priority: Priority::Low,
            start_date: None,
            due_date: None,
        }
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_title("task", &self.title)?;
        validate_rank("task", &self.rank)?;
        if let (Some(start), Some(due)) = (self.start_date, self.due_date) {
            if due < start {
                return Err(ModelValidationError::InvalidDateRange { start, due });
            }
        }
        Ok(())
    }
}
