//! Trash entry: a restorable snapshot of a deleted entity.

use super::board::BoardId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a trash entry.
pub type TrashId = Uuid;

/// Which table the snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrashedKind {
    Column,
    Row,
    Task,
}

/// A deleted column, row or task, kept as a JSON snapshot so it can be
/// restored verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashEntry {
    /// Stable ID of the trash entry itself.
    pub uuid: TrashId,
    /// Board the deleted entity belonged to.
    pub board_uuid: BoardId,
    /// Entity table of origin.
    pub kind: TrashedKind,
    /// ID the entity had before deletion; reused on restore.
    pub entity_uuid: Uuid,
    /// Full JSON snapshot of the deleted record.
    pub payload: String,
    /// Epoch ms deletion timestamp, assigned by storage.
    pub created_at: i64,
}

impl TrashEntry {
    /// Creates an entry pending insertion; `created_at` is assigned by the
    /// database on write.
    pub fn new(board_uuid: BoardId, kind: TrashedKind, entity_uuid: Uuid, payload: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            board_uuid,
            kind,
            entity_uuid,
            payload,
            created_at: 0,
        }
    }
}
