//! Core domain logic for boardkit.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod rank;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Board, BoardId, Column, ColumnId, ModelValidationError, Priority, Row, RowId, Task, TaskId,
    TrashEntry, TrashId, TrashedKind,
};
pub use rank::{
    rank_for_insert_at, rank_for_move, rebalance, sort_ascending, Bucket, InsertPosition, Rank,
    RankError,
};
pub use repo::{
    BoardRepository, ColumnRepository, RepoError, RepoResult, RowRepository,
    SqliteBoardRepository, SqliteColumnRepository, SqliteRowRepository, SqliteTaskRepository,
    SqliteTrashRepository, TaskRepository, TrashRepository,
};
pub use service::{BoardService, RestoredEntity};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
