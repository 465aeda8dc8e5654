//! Trash repository contract and SQLite implementation.
//!
//! Deleted columns, rows and tasks are stored as JSON snapshots so a
//! restore can reinsert the record verbatim, including its old rank.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::{BoardId, TrashEntry, TrashId, TrashedKind};
use rusqlite::{params, Connection, Row};

const TRASH_SELECT_SQL: &str =
    "SELECT uuid, board_uuid, kind, entity_uuid, payload, created_at FROM trash";

/// Repository interface for trash bookkeeping.
pub trait TrashRepository {
    /// Inserts a snapshot and returns it with its storage timestamp.
    fn add_entry(&self, entry: &TrashEntry) -> RepoResult<TrashEntry>;
    fn get_entry(&self, id: TrashId) -> RepoResult<Option<TrashEntry>>;
    /// Lists a board's trash, newest first.
    fn list_board_trash(&self, board_uuid: BoardId) -> RepoResult<Vec<TrashEntry>>;
    fn delete_entry(&self, id: TrashId) -> RepoResult<()>;
    /// Drops every entry of a board; used when the board itself goes away
    /// or the user empties the trash.
    fn empty_board_trash(&self, board_uuid: BoardId) -> RepoResult<()>;
}

/// SQLite-backed trash repository.
pub struct SqliteTrashRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrashRepository<'conn> {
    /// Creates the repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "trash",
            &["uuid", "board_uuid", "kind", "entity_uuid", "payload", "created_at"],
        )?;
        Ok(Self { conn })
    }
}

impl TrashRepository for SqliteTrashRepository<'_> {
    fn add_entry(&self, entry: &TrashEntry) -> RepoResult<TrashEntry> {
        self.conn.execute(
            "INSERT INTO trash (uuid, board_uuid, kind, entity_uuid, payload)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.uuid.to_string(),
                entry.board_uuid.to_string(),
                kind_to_db(entry.kind),
                entry.entity_uuid.to_string(),
                entry.payload.as_str(),
            ],
        )?;

        self.get_entry(entry.uuid)?
            .ok_or(RepoError::NotFound(entry.uuid))
    }

    fn get_entry(&self, id: TrashId) -> RepoResult<Option<TrashEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TRASH_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_trash_row(row)?));
        }
        Ok(None)
    }

    fn list_board_trash(&self, board_uuid: BoardId) -> RepoResult<Vec<TrashEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRASH_SELECT_SQL} WHERE board_uuid = ?1 ORDER BY created_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([board_uuid.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_trash_row(row)?);
        }
        Ok(entries)
    }

    fn delete_entry(&self, id: TrashId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM trash WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn empty_board_trash(&self, board_uuid: BoardId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM trash WHERE board_uuid = ?1;",
            [board_uuid.to_string()],
        )?;
        Ok(())
    }
}

fn parse_trash_row(row: &Row<'_>) -> RepoResult<TrashEntry> {
    let uuid_text: String = row.get("uuid")?;
    let board_text: String = row.get("board_uuid")?;
    let entity_text: String = row.get("entity_uuid")?;
    let kind_text: String = row.get("kind")?;

    Ok(TrashEntry {
        uuid: parse_uuid(&uuid_text, "trash.uuid")?,
        board_uuid: parse_uuid(&board_text, "trash.board_uuid")?,
        kind: parse_kind(&kind_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid trash kind `{kind_text}` in trash.kind"))
        })?,
        entity_uuid: parse_uuid(&entity_text, "trash.entity_uuid")?,
        payload: row.get("payload")?,
        created_at: row.get("created_at")?,
    })
}

fn kind_to_db(kind: TrashedKind) -> &'static str {
    match kind {
        TrashedKind::Column => "column",
        TrashedKind::Row => "row",
        TrashedKind::Task => "task",
    }
}

fn parse_kind(value: &str) -> Option<TrashedKind> {
    match value {
        "column" => Some(TrashedKind::Column),
        "row" => Some(TrashedKind::Row),
        "task" => Some(TrashedKind::Task),
        _ => None,
    }
}
