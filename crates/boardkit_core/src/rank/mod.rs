//! Lexicographic order keys for board entities.
//!
//! # Responsibility
//! - Generate string keys that sort entities without renumbering siblings.
//! - Provide midpoint, neighbor-resolution and rebalancing primitives.
//!
//! # Invariants
//! - `Ord` on [`Rank`] agrees with byte-wise comparison of its string form.
//! - Every operation is a pure function: no I/O, no logging, no retries.
//! - Exhaustion is reported to the caller; recovery (rebalance, then retry
//!   once) is the caller's decision.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod codec;
pub mod key;
pub mod order;
pub mod policy;

pub use key::{Bucket, Rank};
pub use order::{rebalance, rebalance_in_bucket, sort_ascending};
pub use policy::{rank_for_insert_at, rank_for_move, InsertPosition};

pub type RankResult<T> = Result<T, RankError>;

/// Errors from rank parsing, allocation and rebalancing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankError {
    /// Input string is not a canonical rank. Indicates corrupt persisted
    /// data or a caller bug; not retryable.
    Malformed(String),
    /// `prev` does not sort strictly before `next`. Caller bug.
    InvalidOrder { prev: String, next: String },
    /// Neighbors live in different buckets. Caller bug.
    BucketMismatch { prev: String, next: String },
    /// Position anchor id is not a member of the group. Caller bug.
    NeighborNotFound(Uuid),
    /// No key exists between the neighbors within the precision bound.
    /// Retryable exactly once, after the caller rebalances the group.
    Exhausted,
}

impl Display for RankError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed rank: {message}"),
            Self::InvalidOrder { prev, next } => {
                write!(f, "rank `{prev}` does not sort before `{next}`")
            }
            Self::BucketMismatch { prev, next } => {
                write!(f, "ranks `{prev}` and `{next}` are in different buckets")
            }
            Self::NeighborNotFound(id) => write!(f, "position anchor not in group: {id}"),
            Self::Exhausted => write!(f, "no rank available between neighbors; rebalance required"),
        }
    }
}

impl Error for RankError {}
