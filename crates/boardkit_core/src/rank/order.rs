//! Group ordering and exhaustion recovery.
//!
//! # Responsibility
//! - Produce the deterministic ascending order of a ranked group.
//! - Regenerate evenly spaced keys for a whole group after exhaustion.
//!
//! # Invariants
//! - Ties on identical rank strings (a defect state) break by ascending id,
//!   so the same snapshot always sorts the same way.
//! - Rebalancing preserves the relative order it is given and allocates in
//!   the next bucket, so fresh keys never collide with the old sequence.

use super::codec;
use super::key::{Bucket, Rank};
use super::{RankError, RankResult};
use uuid::Uuid;

/// Sorts a group ascending by rank, breaking duplicate ranks by id.
pub fn sort_ascending(entries: &mut [(Uuid, Rank)]) {
    entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
}

/// Regenerates evenly spaced integer-precision ranks for a group already in
/// desired order, rotating into the next bucket.
///
/// Touches every entry; callers must persist all returned pairs atomically
/// or accept a transient inconsistent order.
pub fn rebalance(entries: &[(Uuid, Rank)]) -> RankResult<Vec<(Uuid, Rank)>> {
    let bucket = entries
        .first()
        .map_or(Bucket::INITIAL, |(_, rank)| rank.bucket().next());
    rebalance_in_bucket(entries, bucket)
}

/// Same as [`rebalance`] with an explicit target bucket.
pub fn rebalance_in_bucket(
    entries: &[(Uuid, Rank)],
    bucket: Bucket,
) -> RankResult<Vec<(Uuid, Rank)>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let slots = entries.len() as u64 + 1;
    let step = (codec::MAX_INT_VALUE + 1) / slots;
    if step == 0 {
        return Err(RankError::Exhausted);
    }

    Ok(entries
        .iter()
        .enumerate()
        .map(|(index, (id, _))| (*id, Rank::from_integer(bucket, step * (index as u64 + 1))))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{rebalance, rebalance_in_bucket, sort_ascending};
    use crate::rank::{Bucket, Rank};
    use uuid::Uuid;

    fn fixed_id(tail: u32) -> Uuid {
        Uuid::parse_str(&format!("00000000-0000-4000-8000-{tail:012}")).unwrap()
    }

    #[test]
    fn sort_is_deterministic_for_duplicate_ranks() {
        let duplicate = Rank::parse("0|hzzzzz:").unwrap();
        let mut entries = vec![
            (fixed_id(2), duplicate.clone()),
            (fixed_id(3), Rank::parse("0|g00000:").unwrap()),
            (fixed_id(1), duplicate),
        ];
        sort_ascending(&mut entries);

        let ids: Vec<Uuid> = entries.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![fixed_id(3), fixed_id(1), fixed_id(2)]);
    }

    #[test]
    fn rebalance_preserves_relative_order_and_spacing() {
        let entries: Vec<(Uuid, Rank)> = ["0|hzzzzz:", "0|hzzzzz:i", "0|hzzzzz:r"]
            .iter()
            .enumerate()
            .map(|(i, text)| (fixed_id(i as u32), Rank::parse(text).unwrap()))
            .collect();

        let fresh = rebalance(&entries).unwrap();
        assert_eq!(fresh.len(), entries.len());
        for (before, after) in fresh.iter().zip(fresh.iter().skip(1)) {
            assert!(before.1 < after.1);
        }
        for ((id_in, _), (id_out, rank)) in entries.iter().zip(fresh.iter()) {
            assert_eq!(id_in, id_out);
            assert_eq!(rank.bucket().value(), 1);
            // Fresh keys are integer precision only.
            assert!(rank.to_string().ends_with(':'));
        }
    }

    #[test]
    fn rebalance_of_empty_group_is_empty() {
        assert!(rebalance(&[]).unwrap().is_empty());
    }

    #[test]
    fn rebalance_bucket_rotation_wraps() {
        let entries = vec![(fixed_id(1), Rank::parse("2|hzzzzz:").unwrap())];
        let fresh = rebalance(&entries).unwrap();
        assert_eq!(fresh[0].1.bucket(), Bucket::INITIAL);
    }

    #[test]
    fn explicit_bucket_is_honored() {
        let entries = vec![(fixed_id(1), Rank::parse("0|hzzzzz:").unwrap())];
        let fresh = rebalance_in_bucket(&entries, Bucket::new(2).unwrap()).unwrap();
        assert_eq!(fresh[0].1.bucket().value(), 2);
    }
}
