//! Board repository contract and SQLite implementation.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::{Board, BoardId};
use rusqlite::{params, Connection, Row};

const BOARD_SELECT_SQL: &str = "SELECT uuid, title, summary FROM boards";

/// Repository interface for board CRUD operations.
pub trait BoardRepository {
    fn create_board(&self, board: &Board) -> RepoResult<BoardId>;
    fn get_board(&self, id: BoardId) -> RepoResult<Option<Board>>;
    /// Lists all boards, most recently updated first.
    fn list_boards(&self) -> RepoResult<Vec<Board>>;
    fn update_board(&self, board: &Board) -> RepoResult<()>;
    /// Hard-deletes a board; dependent rows go with it via FK cascade.
    fn delete_board(&self, id: BoardId) -> RepoResult<()>;
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates the repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "boards", &["uuid", "title", "summary", "updated_at"])?;
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn create_board(&self, board: &Board) -> RepoResult<BoardId> {
        board.validate()?;

        self.conn.execute(
            "INSERT INTO boards (uuid, title, summary) VALUES (?1, ?2, ?3);",
            params![
                board.uuid.to_string(),
                board.title.as_str(),
                board.summary.as_deref(),
            ],
        )?;

        Ok(board.uuid)
    }

    fn get_board(&self, id: BoardId) -> RepoResult<Option<Board>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOARD_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_board_row(row)?));
        }
        Ok(None)
    }

    fn list_boards(&self) -> RepoResult<Vec<Board>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOARD_SELECT_SQL} ORDER BY updated_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut boards = Vec::new();
        while let Some(row) = rows.next()? {
            boards.push(parse_board_row(row)?);
        }
        Ok(boards)
    }

    fn update_board(&self, board: &Board) -> RepoResult<()> {
        board.validate()?;

        let changed = self.conn.execute(
            "UPDATE boards
             SET title = ?1,
                 summary = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?3;",
            params![
                board.title.as_str(),
                board.summary.as_deref(),
                board.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(board.uuid));
        }
        Ok(())
    }

    fn delete_board(&self, id: BoardId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM boards WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_board_row(row: &Row<'_>) -> RepoResult<Board> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Board {
        uuid: parse_uuid(&uuid_text, "boards.uuid")?,
        title: row.get("title")?,
        summary: row.get("summary")?,
    })
}
