//! Column repository contract and SQLite implementation.
//!
//! # Invariants
//! - Column listing is deterministic: `rank ASC, uuid ASC`.
//! - Bulk rank updates are atomic; a rebalanced sequence is either fully
//!   persisted or not at all.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::{BoardId, Column, ColumnId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const COLUMN_SELECT_SQL: &str =
    "SELECT uuid, board_uuid, title, color, rank FROM board_columns";

/// Repository interface for column CRUD and rank persistence.
pub trait ColumnRepository {
    fn create_column(&self, column: &Column) -> RepoResult<ColumnId>;
    fn get_column(&self, id: ColumnId) -> RepoResult<Option<Column>>;
    /// Lists a board's columns in rank order.
    fn list_columns(&self, board_uuid: BoardId) -> RepoResult<Vec<Column>>;
    fn update_column(&self, column: &Column) -> RepoResult<()>;
    /// Persists a rebalanced rank sequence in one transaction.
    fn update_column_ranks(&self, ranks: &[(Uuid, String)]) -> RepoResult<()>;
    fn delete_column(&self, id: ColumnId) -> RepoResult<()>;
}

/// SQLite-backed column repository.
pub struct SqliteColumnRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteColumnRepository<'conn> {
    /// Creates the repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "board_columns",
            &["uuid", "board_uuid", "title", "color", "rank"],
        )?;
        Ok(Self { conn })
    }
}

impl ColumnRepository for SqliteColumnRepository<'_> {
    fn create_column(&self, column: &Column) -> RepoResult<ColumnId> {
        column.validate()?;

        self.conn.execute(
            "INSERT INTO board_columns (uuid, board_uuid, title, color, rank)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                column.uuid.to_string(),
                column.board_uuid.to_string(),
                column.title.as_str(),
                column.color.as_str(),
                column.rank.as_str(),
            ],
        )?;

        Ok(column.uuid)
    }

    fn get_column(&self, id: ColumnId) -> RepoResult<Option<Column>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COLUMN_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_column_row(row)?));
        }
        Ok(None)
    }

    fn list_columns(&self, board_uuid: BoardId) -> RepoResult<Vec<Column>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COLUMN_SELECT_SQL} WHERE board_uuid = ?1 ORDER BY rank ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([board_uuid.to_string()])?;
        let mut columns = Vec::new();
        while let Some(row) = rows.next()? {
            columns.push(parse_column_row(row)?);
        }
        Ok(columns)
    }

    fn update_column(&self, column: &Column) -> RepoResult<()> {
        column.validate()?;

        let changed = self.conn.execute(
            "UPDATE board_columns
             SET title = ?1,
                 color = ?2,
                 rank = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                column.title.as_str(),
                column.color.as_str(),
                column.rank.as_str(),
                column.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(column.uuid));
        }
        Ok(())
    }

    fn update_column_ranks(&self, ranks: &[(Uuid, String)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (uuid, rank) in ranks {
            let changed = tx.execute(
                "UPDATE board_columns
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

    fn delete_column(&self, id: ColumnId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM board_columns WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_column_row(row: &Row<'_>) -> RepoResult<Column> {
    let uuid_text: String = row.get("uuid")?;
    let board_text: String = row.get("board_uuid")?;
    let column = Column {
        uuid: parse_uuid(&uuid_text, "board_columns.uuid")?,
        board_uuid: parse_uuid(&board_text, "board_columns.board_uuid")?,
        title: row.get("title")?,
        color: row.get("color")?,
        rank: row.get("rank")?,
    };
    column.validate()?;
    Ok(column)
}
