//! Rank allocation policy: the call surface application code uses.
//!
//! # Responsibility
//! - Resolve the neighbor pair straddling a requested position.
//! - Delegate key computation to [`Rank::between`].
//!
//! # Invariants
//! - Groups are passed sorted ascending by rank; the policy never reorders.
//! - Pure functions of their inputs; persisting the returned key is the
//!   caller's job, as is rebalancing on [`RankError::Exhausted`].

use super::key::Rank;
use super::{RankError, RankResult};
use uuid::Uuid;

/// Where a new or moved entity lands within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before every current member.
    Start,
    /// After every current member.
    End,
    /// Immediately after the member with this id.
    After(Uuid),
    /// Immediately before the member with this id.
    Before(Uuid),
}

/// Computes the rank for inserting a new entity into `group` at `position`.
///
/// `group` is the ascending `(id, rank)` snapshot of the target siblings.
pub fn rank_for_insert_at(group: &[(Uuid, Rank)], position: InsertPosition) -> RankResult<Rank> {
    match position {
        InsertPosition::Start => Rank::between(None, group.first().map(|(_, rank)| rank)),
        InsertPosition::End => Rank::between(group.last().map(|(_, rank)| rank), None),
        InsertPosition::After(anchor) => {
            let index = position_of(group, anchor)?;
            Rank::between(
                Some(&group[index].1),
                group.get(index + 1).map(|(_, rank)| rank),
            )
        }
        InsertPosition::Before(anchor) => {
            let index = position_of(group, anchor)?;
            let prev = index.checked_sub(1).map(|i| &group[i].1);
            Rank::between(prev, Some(&group[index].1))
        }
    }
}

/// Computes the rank for moving `moving_id` to `position`, excluding the
/// entity itself from neighbor resolution.
pub fn rank_for_move(
    group: &[(Uuid, Rank)],
    moving_id: Uuid,
    position: InsertPosition,
) -> RankResult<Rank> {
    let rest: Vec<(Uuid, Rank)> = group
        .iter()
        .filter(|(id, _)| *id != moving_id)
        .cloned()
        .collect();
    rank_for_insert_at(&rest, position)
}

fn position_of(group: &[(Uuid, Rank)], anchor: Uuid) -> RankResult<usize> {
    group
        .iter()
        .position(|(id, _)| *id == anchor)
        .ok_or(RankError::NeighborNotFound(anchor))
}
