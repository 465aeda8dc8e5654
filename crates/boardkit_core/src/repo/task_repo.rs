//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Cell listing is deterministic: `rank ASC, uuid ASC`.
//! - Bulk rank updates are atomic.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::{BoardId, ColumnId, Priority, RowId, Task, TaskId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    board_uuid,
    column_uuid,
    row_uuid,
    title,
    rank,
    priority,
    start_date,
    due_date
FROM tasks";

/// Repository interface for task CRUD and rank persistence.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists every task of a board in rank order.
    fn list_tasks(&self, board_uuid: BoardId) -> RepoResult<Vec<Task>>;
    /// Lists the tasks of one (column, row) cell in rank order.
    fn list_cell_tasks(
        &self,
        board_uuid: BoardId,
        column_uuid: ColumnId,
        row_uuid: RowId,
    ) -> RepoResult<Vec<Task>>;
    /// Lists the tasks of one column across all rows, in rank order.
    fn list_column_tasks(&self, column_uuid: ColumnId) -> RepoResult<Vec<Task>>;
    /// Lists the tasks of one row across all columns, in rank order.
    fn list_row_tasks(&self, row_uuid: RowId) -> RepoResult<Vec<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    /// Persists a rebalanced rank sequence in one transaction.
    fn update_task_ranks(&self, ranks: &[(Uuid, String)]) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates the repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "tasks",
            &[
                "uuid",
                "board_uuid",
                "column_uuid",
                "row_uuid",
                "title",
                "rank",
                "priority",
                "start_date",
                "due_date",
            ],
        )?;
        Ok(Self { conn })
    }

    fn list_where(&self, clause: &str, key: String) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE {clause} ORDER BY rank ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([key])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                board_uuid,
                column_uuid,
                row_uuid,
                title,
                rank,
                priority,
                start_date,
                due_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                task.uuid.to_string(),
                task.board_uuid.to_string(),
                task.column_uuid.to_string(),
                task.row_uuid.to_string(),
                task.title.as_str(),
                task.rank.as_str(),
                priority_to_db(task.priority),
                task.start_date,
                task.due_date,
            ],
        )?;

        Ok(task.uuid)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self, board_uuid: BoardId) -> RepoResult<Vec<Task>> {
        self.list_where("board_uuid = ?1", board_uuid.to_string())
    }

    fn list_cell_tasks(
        &self,
        board_uuid: BoardId,
        column_uuid: ColumnId,
        row_uuid: RowId,
    ) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE board_uuid = ?1
               AND column_uuid = ?2
               AND row_uuid = ?3
             ORDER BY rank ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![
            board_uuid.to_string(),
            column_uuid.to_string(),
            row_uuid.to_string(),
        ])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn list_column_tasks(&self, column_uuid: ColumnId) -> RepoResult<Vec<Task>> {
        self.list_where("column_uuid = ?1", column_uuid.to_string())
    }

    fn list_row_tasks(&self, row_uuid: RowId) -> RepoResult<Vec<Task>> {
        self.list_where("row_uuid = ?1", row_uuid.to_string())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET column_uuid = ?1,
                 row_uuid = ?2,
                 title = ?3,
                 rank = ?4,
                 priority = ?5,
                 start_date = ?6,
                 due_date = ?7,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?8;",
            params![
                task.column_uuid.to_string(),
                task.row_uuid.to_string(),
                task.title.as_str(),
                task.rank.as_str(),
                priority_to_db(task.priority),
                task.start_date,
                task.due_date,
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.uuid));
        }
        Ok(())
    }

    fn update_task_ranks(&self, ranks: &[(Uuid, String)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (uuid, rank) in ranks {
            let changed = tx.execute(
                "UPDATE tasks
                 SET rank = ?2,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                params![uuid.to_string(), rank.as_str()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(*uuid));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let board_text: String = row.get("board_uuid")?;
    let column_text: String = row.get("column_uuid")?;
    let row_text: String = row.get("row_uuid")?;
    let priority_text: String = row.get("priority")?;

    let task = Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        board_uuid: parse_uuid(&board_text, "tasks.board_uuid")?,
        column_uuid: parse_uuid(&column_text, "tasks.column_uuid")?,
        row_uuid: parse_uuid(&row_text, "tasks.row_uuid")?,
        title: row.get("title")?,
        rank: row.get("rank")?,
        priority: parse_priority(&priority_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid priority `{priority_text}` in tasks.priority"))
        })?,
        start_date: row.get("start_date")?,
        due_date: row.get("due_date")?,
    };
    task.validate()?;
    Ok(task)
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}
