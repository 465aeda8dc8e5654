//! Domain model for boards and their ordered entities.
//!
//! # Responsibility
//! - Define the canonical records persisted by the repository layer.
//! - Validate business invariants before any SQL mutation.
//!
//! # Invariants
//! - Every record is identified by a stable uuid that is never reused.
//! - Columns, rows and tasks carry an opaque `rank` string; only the
//!   `rank` module interprets it.
//! - Deleting a column, row or task moves a JSON snapshot to the trash;
//!   boards are the only hard-deleted aggregate.

use crate::rank::RankError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board;
pub mod column;
pub mod row;
pub mod task;
pub mod trash;

pub use board::{Board, BoardId};
pub use column::{Column, ColumnId};
pub use row::{Row, RowId};
pub use task::{Priority, Task, TaskId};
pub use trash::{TrashEntry, TrashId, TrashedKind};

/// Validation failures raised before persistence.
#[derive(Debug)]
pub enum ModelValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle { entity: &'static str },
    /// The entity's rank string does not parse.
    InvalidRank {
        entity: &'static str,
        source: RankError,
    },
    /// `due_date` is earlier than `start_date`.
    InvalidDateRange { start: i64, due: i64 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle { entity } => write!(f, "{entity} title must not be empty"),
            Self::InvalidRank { entity, source } => {
                write!(f, "{entity} carries an invalid rank: {source}")
            }
            Self::InvalidDateRange { start, due } => {
                write!(f, "due date {due} is earlier than start date {start}")
            }
        }
    }
}

impl Error for ModelValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRank { source, .. } => Some(source),
            Self::EmptyTitle { .. } => None,
            Self::InvalidDateRange { .. } => None,
        }
    }
}

fn validate_title(entity: &'static str, title: &str) -> Result<(), ModelValidationError> {
    if title.trim().is_empty() {
        return Err(ModelValidationError::EmptyTitle { entity });
    }
    Ok(())
}

fn validate_rank(entity: &'static str, rank: &str) -> Result<(), ModelValidationError> {
    crate::rank::Rank::parse(rank)
        .map(|_| ())
        .map_err(|source| ModelValidationError::InvalidRank { entity, source })
}
