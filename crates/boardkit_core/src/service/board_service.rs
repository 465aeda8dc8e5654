//! Board use-case service.
//!
//! # Responsibility
//! - Provide stable board/column/row/task entry points for core callers.
//! - Allocate order keys through the rank policy on every insert and move.
//! - Recover from rank exhaustion: rebalance the group, persist atomically,
//!   retry the allocation exactly once.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Deleted columns, rows and tasks leave a restorable trash snapshot;
//!   boards are the only hard-deleted aggregate.

use crate::model::{
    Board, BoardId, Column, ColumnId, Row, RowId, Task, TaskId, TrashEntry, TrashId, TrashedKind,
};
use crate::rank::{
    self, rank_for_insert_at, rank_for_move, InsertPosition, Rank, RankError, RankResult,
};
use crate::repo::{
    BoardRepository, ColumnRepository, RepoError, RepoResult, RowRepository, SqliteBoardRepository,
    SqliteColumnRepository, SqliteRowRepository, SqliteTaskRepository, SqliteTrashRepository,
    TaskRepository, TrashRepository,
};
use log::info;
use rusqlite::Connection;
use uuid::Uuid;

/// Default layout every new board starts with, taken from the stock board
/// template.
const DEFAULT_ROW: (&str, &str) = ("All Tasks", "rgba(71, 111, 254, 0.5)");
const DEFAULT_COLUMNS: &[(&str, &str)] = &[
    ("Todo", "rgba(68, 133, 255, 0.5)"),
    ("In Progress", "rgba(255, 195, 74, 0.5)"),
    ("Completed", "rgba(0, 214, 107, 0.5)"),
];

/// An entity reinserted from the trash.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoredEntity {
    Column(Column),
    Row(Row),
    Task(Task),
}

/// Use-case service over one migrated connection.
pub struct BoardService<'conn> {
    boards: SqliteBoardRepository<'conn>,
    columns: SqliteColumnRepository<'conn>,
    rows: SqliteRowRepository<'conn>,
    tasks: SqliteTaskRepository<'conn>,
    trash: SqliteTrashRepository<'conn>,
}

impl<'conn> BoardService<'conn> {
    /// Creates the service over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            boards: SqliteBoardRepository::try_new(conn)?,
            columns: SqliteColumnRepository::try_new(conn)?,
            rows: SqliteRowRepository::try_new(conn)?,
            tasks: SqliteTaskRepository::try_new(conn)?,
            trash: SqliteTrashRepository::try_new(conn)?,
        })
    }

    // --- boards ---

    /// Creates a board with the default layout: one "All Tasks" row and the
    /// Todo / In Progress / Completed columns, ranks allocated through the
    /// policy.
    pub fn create_board(
        &self,
        title: impl Into<String>,
        summary: Option<String>,
    ) -> RepoResult<Board> {
        let board = Board::new(title, summary);
        self.boards.create_board(&board)?;

        let (row_title, row_color) = DEFAULT_ROW;
        let row_rank = Rank::between(None, None)?;
        let row = Row::new(board.uuid, row_title, Some(row_color.to_string()), &row_rank);
        self.rows.create_row(&row)?;

        let mut group: Vec<(Uuid, Rank)> = Vec::with_capacity(DEFAULT_COLUMNS.len());
        for (column_title, column_color) in DEFAULT_COLUMNS {
            let rank = rank_for_insert_at(&group, InsertPosition::End)?;
            let column = Column::new(board.uuid, *column_title, *column_color, &rank);
            self.columns.create_column(&column)?;
            group.push((column.uuid, rank));
        }

        info!(
            "event=board_create module=service status=ok board={} columns={}",
            board.uuid,
            DEFAULT_COLUMNS.len()
        );
        Ok(board)
    }

    /// Gets one board by ID.
    pub fn get_board(&self, id: BoardId) -> RepoResult<Option<Board>> {
        self.boards.get_board(id)
    }

    /// Lists all boards, most recently updated first.
    pub fn list_boards(&self) -> RepoResult<Vec<Board>> {
        self.boards.list_boards()
    }

    /// Updates board title/summary.
    pub fn update_board(&self, board: &Board) -> RepoResult<()> {
        self.boards.update_board(board)
    }

    /// Hard-deletes a board. Columns, rows, tasks and trash entries go with
    /// it via foreign-key cascade.
    pub fn delete_board(&self, id: BoardId) -> RepoResult<()> {
        self.boards.delete_board(id)?;
        info!("event=board_delete module=service status=ok board={id}");
        Ok(())
    }

    // --- columns ---

    /// Adds a column at the end of the board's column order.
    pub fn add_column(
        &self,
        board_uuid: BoardId,
        title: impl Into<String>,
        color: impl Into<String>,
    ) -> RepoResult<Column> {
        let group = self.column_group(board_uuid)?;
        let rank = self.allocate_rank(
            &group,
            "columns",
            |group| rank_for_insert_at(group, InsertPosition::End),
            |pairs| self.columns.update_column_ranks(pairs),
        )?;
        let column = Column::new(board_uuid, title, color, &rank);
        self.columns.create_column(&column)?;
        Ok(column)
    }

    /// Lists a board's columns in rank order.
    pub fn list_columns(&self, board_uuid: BoardId) -> RepoResult<Vec<Column>> {
        self.columns.list_columns(board_uuid)
    }

    /// Updates column title/color (and rank, if the caller reallocated it).
    pub fn update_column(&self, column: &Column) -> RepoResult<()> {
        self.columns.update_column(column)
    }

    /// Moves a column to a new position among its board's columns.
    pub fn move_column(&self, id: ColumnId, position: InsertPosition) -> RepoResult<Column> {
        let mut column = self
            .columns
            .get_column(id)?
            .ok_or(RepoError::NotFound(id))?;
        let group = self.column_group(column.board_uuid)?;
        let rank = self.allocate_rank(
            &group,
            "columns",
            |group| rank_for_move(group, id, position),
            |pairs| self.columns.update_column_ranks(pairs),
        )?;
        column.rank = rank.to_string();
        self.columns.update_column(&column)?;
        Ok(column)
    }

    /// Deletes a column into the trash, taking its tasks with it: every
    /// task of the column gets its own trash snapshot, then the column.
    pub fn delete_column(&self, id: ColumnId) -> RepoResult<TrashEntry> {
        let column = self
            .columns
            .get_column(id)?
            .ok_or(RepoError::NotFound(id))?;

        for task in self.tasks.list_column_tasks(id)? {
            self.trash_task(&task)?;
        }

        let payload = serde_json::to_string(&column)?;
        let entry = self.trash.add_entry(&TrashEntry::new(
            column.board_uuid,
            TrashedKind::Column,
            column.uuid,
            payload,
        ))?;
        self.columns.delete_column(id)?;

        info!(
            "event=column_delete module=service status=ok board={} column={id}",
            column.board_uuid
        );
        Ok(entry)
    }

    // --- rows ---

    /// Adds a row at the end of the board's row order.
    pub fn add_row(
        &self,
        board_uuid: BoardId,
        title: impl Into<String>,
        color: Option<String>,
    ) -> RepoResult<Row> {
        let group = self.row_group(board_uuid)?;
        let rank = self.allocate_rank(
            &group,
            "rows",
            |group| rank_for_insert_at(group, InsertPosition::End),
            |pairs| self.rows.update_row_ranks(pairs),
        )?;
        let row = Row::new(board_uuid, title, color, &rank);
        self.rows.create_row(&row)?;
        Ok(row)
    }

    /// Lists a board's rows in rank order.
    pub fn list_rows(&self, board_uuid: BoardId) -> RepoResult<Vec<Row>> {
        self.rows.list_rows(board_uuid)
    }

    /// Updates row title/color (and rank, if the caller reallocated it).
    pub fn update_row(&self, row: &Row) -> RepoResult<()> {
        self.rows.update_row(row)
    }

    /// Moves a row to a new position among its board's rows.
    pub fn move_row(&self, id: RowId, position: InsertPosition) -> RepoResult<Row> {
        let mut row = self.rows.get_row(id)?.ok_or(RepoError::NotFound(id))?;
        let group = self.row_group(row.board_uuid)?;
        let rank = self.allocate_rank(
            &group,
            "rows",
            |group| rank_for_move(group, id, position),
            |pairs| self.rows.update_row_ranks(pairs),
        )?;
        row.rank = rank.to_string();
        self.rows.update_row(&row)?;
        Ok(row)
    }

    /// Deletes a row into the trash, taking its tasks with it.
    pub fn delete_row(&self, id: RowId) -> RepoResult<TrashEntry> {
        let row = self.rows.get_row(id)?.ok_or(RepoError::NotFound(id))?;

        for task in self.tasks.list_row_tasks(id)? {
            self.trash_task(&task)?;
        }

        let payload = serde_json::to_string(&row)?;
        let entry = self.trash.add_entry(&TrashEntry::new(
            row.board_uuid,
            TrashedKind::Row,
            row.uuid,
            payload,
        ))?;
        self.rows.delete_row(id)?;

        info!(
            "event=row_delete module=service status=ok board={} row={id}",
            row.board_uuid
        );
        Ok(entry)
    }

    // --- tasks ---

    /// Adds a task at the start of its (column, row) cell. New tasks
    /// prepend: the latest addition shows on top.
    pub fn add_task(
        &self,
        board_uuid: BoardId,
        column_uuid: ColumnId,
        row_uuid: RowId,
        title: impl Into<String>,
    ) -> RepoResult<Task> {
        let group = self.cell_group(board_uuid, column_uuid, row_uuid)?;
        let rank = self.allocate_rank(
            &group,
            "tasks",
            |group| rank_for_insert_at(group, InsertPosition::Start),
            |pairs| self.tasks.update_task_ranks(pairs),
        )?;
        let task = Task::new(board_uuid, column_uuid, row_uuid, title, &rank);
        self.tasks.create_task(&task)?;
        Ok(task)
    }

    /// Gets one task by ID.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.tasks.get_task(id)
    }

    /// Lists the tasks of one (column, row) cell in rank order.
    pub fn list_cell_tasks(
        &self,
        board_uuid: BoardId,
        column_uuid: ColumnId,
        row_uuid: RowId,
    ) -> RepoResult<Vec<Task>> {
        self.tasks.list_cell_tasks(board_uuid, column_uuid, row_uuid)
    }

    /// Updates task fields (title, priority, dates) in place.
    pub fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.tasks.update_task(task)
    }

    /// Moves a task within its cell or into another (column, row) cell of
    /// the same board, landing at `position` among the destination tasks.
    pub fn move_task(
        &self,
        id: TaskId,
        column_uuid: ColumnId,
        row_uuid: RowId,
        position: InsertPosition,
    ) -> RepoResult<Task> {
        let mut task = self.tasks.get_task(id)?.ok_or(RepoError::NotFound(id))?;
        let group = self.cell_group(task.board_uuid, column_uuid, row_uuid)?;
        // For a cross-cell move the filter is a no-op; same call either way.
        let rank = self.allocate_rank(
            &group,
            "tasks",
            |group| rank_for_move(group, id, position),
            |pairs| self.tasks.update_task_ranks(pairs),
        )?;
        task.column_uuid = column_uuid;
        task.row_uuid = row_uuid;
        task.rank = rank.to_string();
        self.tasks.update_task(&task)?;
        Ok(task)
    }

    /// Deletes a task into the trash.
    pub fn delete_task(&self, id: TaskId) -> RepoResult<TrashEntry> {
        let task = self.tasks.get_task(id)?.ok_or(RepoError::NotFound(id))?;
        self.trash_task(&task)
    }

    // --- trash ---

    /// Lists a board's trash, newest first.
    pub fn list_trash(&self, board_uuid: BoardId) -> RepoResult<Vec<TrashEntry>> {
        self.trash.list_board_trash(board_uuid)
    }

    /// Reinserts a trashed entity verbatim, old rank included, and drops
    /// the trash row.
    ///
    /// The restored rank may duplicate a live sibling's rank; listing then
    /// falls back to the id tie-break until the entity is moved.
    pub fn restore(&self, trash_id: TrashId) -> RepoResult<RestoredEntity> {
        let entry = self
            .trash
            .get_entry(trash_id)?
            .ok_or(RepoError::NotFound(trash_id))?;

        let restored = match entry.kind {
            TrashedKind::Column => {
                let column: Column = serde_json::from_str(&entry.payload)?;
                self.columns.create_column(&column)?;
                RestoredEntity::Column(column)
            }
            TrashedKind::Row => {
                let row: Row = serde_json::from_str(&entry.payload)?;
                self.rows.create_row(&row)?;
                RestoredEntity::Row(row)
            }
            TrashedKind::Task => {
                let task: Task = serde_json::from_str(&entry.payload)?;
                self.tasks.create_task(&task)?;
                RestoredEntity::Task(task)
            }
        };
        self.trash.delete_entry(trash_id)?;

        info!(
            "event=trash_restore module=service status=ok board={} entity={}",
            entry.board_uuid, entry.entity_uuid
        );
        Ok(restored)
    }

    /// Drops every trash entry of a board.
    pub fn empty_trash(&self, board_uuid: BoardId) -> RepoResult<()> {
        self.trash.empty_board_trash(board_uuid)
    }

    // --- internals ---

    fn trash_task(&self, task: &Task) -> RepoResult<TrashEntry> {
        let payload = serde_json::to_string(task)?;
        let entry = self.trash.add_entry(&TrashEntry::new(
            task.board_uuid,
            TrashedKind::Task,
            task.uuid,
            payload,
        ))?;
        self.tasks.delete_task(task.uuid)?;
        Ok(entry)
    }

    /// Runs a rank allocation; on exhaustion, rebalances the group into the
    /// next bucket, persists every pair in one transaction and retries the
    /// allocation once. Any other failure propagates unchanged.
    fn allocate_rank<A, P>(
        &self,
        group: &[(Uuid, Rank)],
        scope: &'static str,
        alloc: A,
        persist: P,
    ) -> RepoResult<Rank>
    where
        A: Fn(&[(Uuid, Rank)]) -> RankResult<Rank>,
        P: Fn(&[(Uuid, String)]) -> RepoResult<()>,
    {
        match alloc(group) {
            Ok(rank) => Ok(rank),
            Err(RankError::Exhausted) => {
                let fresh = rank::rebalance(group)?;
                let pairs: Vec<(Uuid, String)> = fresh
                    .iter()
                    .map(|(id, rank)| (*id, rank.to_string()))
                    .collect();
                persist(&pairs)?;
                info!(
                    "event=rank_rebalance module=service status=ok scope={scope} count={}",
                    fresh.len()
                );
                alloc(&fresh).map_err(RepoError::from)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn column_group(&self, board_uuid: BoardId) -> RepoResult<Vec<(Uuid, Rank)>> {
        self.columns
            .list_columns(board_uuid)?
            .iter()
            .map(|column| Ok((column.uuid, Rank::parse(&column.rank)?)))
            .collect()
    }

    fn row_group(&self, board_uuid: BoardId) -> RepoResult<Vec<(Uuid, Rank)>> {
        self.rows
            .list_rows(board_uuid)?
            .iter()
            .map(|row| Ok((row.uuid, Rank::parse(&row.rank)?)))
            .collect()
    }

    fn cell_group(
        &self,
        board_uuid: BoardId,
        column_uuid: ColumnId,
        row_uuid: RowId,
    ) -> RepoResult<Vec<(Uuid, Rank)>> {
        self.tasks
            .list_cell_tasks(board_uuid, column_uuid, row_uuid)?
            .iter()
            .map(|task| Ok((task.uuid, Rank::parse(&task.rank)?)))
            .collect()
    }
}
