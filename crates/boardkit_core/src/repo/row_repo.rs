//! Row repository contract and SQLite implementation.
//!
//! Same shape as the column repository; rows are the board's horizontal
//! grouping lanes.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::{BoardId, Row as BoardRow, RowId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const ROW_SELECT_SQL: &str = "SELECT uuid, board_uuid, title, color, rank FROM board_rows";

/// Repository interface for row CRUD and rank persistence.
pub trait RowRepository {
    fn create_row(&self, board_row: &BoardRow) -> RepoResult<RowId>;
    fn get_row(&self, id: RowId) -> RepoResult<Option<BoardRow>>;
    /// Lists a board's rows in rank order.
    fn list_rows(&self, board_uuid: BoardId) -> RepoResult<Vec<BoardRow>>;
    fn update_row(&self, board_row: &BoardRow) -> RepoResult<()>;
    /// Persists a rebalanced rank sequence in one transaction.
    fn update_row_ranks(&self, ranks: &[(Uuid, String)]) -> RepoResult<()>;
    fn delete_row(&self, id: RowId) -> RepoResult<()>;
}

/// SQLite-backed row repository.
pub struct SqliteRowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRowRepository<'conn> {
    /// Creates the repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "board_rows",
            &["uuid", "board_uuid", "title", "color", "rank"],
        )?;
        Ok(Self { conn })
    }
}

impl RowRepository for SqliteRowRepository<'_> {
    fn create_row(&self, board_row: &BoardRow) -> RepoResult<RowId> {
        board_row.validate()?;

        self.conn.execute(
            "INSERT INTO board_rows (uuid, board_uuid, title, color, rank)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                board_row.uuid.to_string(),
                board_row.board_uuid.to_string(),
                board_row.title.as_str(),
                board_row.color.as_deref(),
                board_row.rank.as_str(),
            ],
        )?;

        Ok(board_row.uuid)
    }

    fn get_row(&self, id: RowId) -> RepoResult<Option<BoardRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROW_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_row_row(row)?));
        }
        Ok(None)
    }

    fn list_rows(&self, board_uuid: BoardId) -> RepoResult<Vec<BoardRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROW_SELECT_SQL} WHERE board_uuid = ?1 ORDER BY rank ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([board_uuid.to_string()])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(parse_row_row(row)?);
        }
        Ok(result)
    }

    fn update_row(&self, board_row: &BoardRow) -> RepoResult<()> {
        board_row.validate()?;

        let changed = self.conn.execute(
            "UPDATE board_rows
             SET title = ?1,
                 color = ?2,
                 rank = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                board_row.title.as_str(),
                board_row.color.as_deref(),
                board_row.rank.as_str(),
                board_row.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(board_row.uuid));
        }
        Ok(())
    }

    fn update_row_ranks(&self, ranks: &[(Uuid, String)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (uuid, rank) in ranks {
            let changed = tx.execute(
                "UPDATE board_rows
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

    fn delete_row(&self, id: RowId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM board_rows WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_row_row(row: &Row<'_>) -> RepoResult<BoardRow> {
    let uuid_text: String = row.get("uuid")?;
    let board_text: String = row.get("board_uuid")?;
    let board_row = BoardRow {
        uuid: parse_uuid(&uuid_text, "board_rows.uuid")?,
        board_uuid: parse_uuid(&board_text, "board_rows.board_uuid")?,
        title: row.get("title")?,
        color: row.get("color")?,
        rank: row.get("rank")?,
    };
    board_row.validate()?;
    Ok(board_row)
}
