//! Rank value type: parsing, formatting and midpoint arithmetic.
//!
//! # Responsibility
//! - Represent one order key as `bucket | integer [: fraction]` digits.
//! - Compute the key between two neighbors, or against the range bounds.
//!
//! # Invariants
//! - Values are immutable; reordering produces a new `Rank`.
//! - The stored digit sequence is canonical: exactly [`codec::INT_WIDTH`]
//!   integer digits, no trailing zero fraction digits.
//! - `between` is deterministic: equal inputs yield the equal output.

use super::codec;
use super::{RankError, RankResult};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SEPARATOR: char = '|';
const FRACTION_MARK: char = ':';

/// Value of the canonical starting key `hzzzzz`, the floor midpoint of the
/// integer range. Matches the persisted data of existing boards.
const MIDDLE_INT_VALUE: u64 = codec::MAX_INT_VALUE / 2;

/// Coarse namespace prefix of a rank. Buckets rotate during rebalancing so
/// regenerated keys never collide with the sequence they replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bucket(u8);

impl Bucket {
    /// Number of buckets in the rotation.
    pub const COUNT: u8 = 3;

    /// Bucket `0`, where every group starts.
    pub const INITIAL: Bucket = Bucket(0);

    /// Creates a bucket from its numeric value, if in range.
    pub fn new(value: u8) -> Option<Bucket> {
        (value < Self::COUNT).then_some(Bucket(value))
    }

    /// Numeric value of this bucket.
    pub fn value(self) -> u8 {
        self.0
    }

    /// The following bucket in rotation order (`0 -> 1 -> 2 -> 0`).
    pub fn next(self) -> Bucket {
        Bucket((self.0 + 1) % Self::COUNT)
    }
}

/// A totally ordered, densely packable order key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rank {
    bucket: Bucket,
    /// Canonical digit sequence: integer part then fraction digits.
    digits: Vec<u8>,
}

impl Rank {
    /// The canonical first key for an empty group: `0|hzzzzz:`.
    pub fn middle() -> Rank {
        Rank::from_integer(Bucket::INITIAL, MIDDLE_INT_VALUE)
    }

    /// Bucket namespace of this key.
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Computes a key that sorts strictly between the given neighbors.
    ///
    /// - Both `None`: returns [`Rank::middle`].
    /// - `prev` only: midpoint towards the bucket ceiling.
    /// - `next` only: midpoint towards the bucket floor.
    /// - Both: exact midpoint; adjacent neighbors gain one fraction digit.
    ///
    /// # Errors
    /// - [`RankError::BucketMismatch`] when neighbors disagree on bucket.
    /// - [`RankError::InvalidOrder`] unless `prev < next`.
    /// - [`RankError::Exhausted`] when the midpoint would exceed
    ///   [`codec::MAX_FRACTION_DIGITS`] or a range bound is already taken.
    pub fn between(prev: Option<&Rank>, next: Option<&Rank>) -> RankResult<Rank> {
        match (prev, next) {
            (None, None) => Ok(Rank::middle()),
            (Some(low), Some(high)) => {
                if low.bucket != high.bucket {
                    return Err(RankError::BucketMismatch {
                        prev: low.to_string(),
                        next: high.to_string(),
                    });
                }
                if low >= high {
                    return Err(RankError::InvalidOrder {
                        prev: low.to_string(),
                        next: high.to_string(),
                    });
                }
                midpoint(low, high)
            }
            (Some(low), None) => {
                let ceiling = Rank::ceiling_of(low.bucket);
                if *low >= ceiling {
                    return Err(RankError::Exhausted);
                }
                midpoint(low, &ceiling)
            }
            (None, Some(high)) => {
                let floor = Rank::floor_of(high.bucket);
                if *high <= floor {
                    return Err(RankError::Exhausted);
                }
                midpoint(&floor, high)
            }
        }
    }

    /// Parses a canonical rank string.
    ///
    /// Accepted shape: `<bucket>|<6 integer digits>:<fraction digits>` with
    /// symbols from the `0-9a-z` alphabet, no trailing zero fraction digits
    /// and at most [`codec::MAX_FRACTION_DIGITS`] fraction digits.
    pub fn parse(input: &str) -> RankResult<Rank> {
        let mut chars = input.chars();
        let bucket_symbol = chars
            .next()
            .ok_or_else(|| RankError::Malformed("empty input".to_string()))?;
        let bucket = bucket_symbol
            .to_digit(10)
            .and_then(|value| Bucket::new(value as u8))
            .ok_or_else(|| RankError::Malformed(format!("invalid bucket `{bucket_symbol}`")))?;

        if chars.next() != Some(SEPARATOR) {
            return Err(RankError::Malformed(format!(
                "expected `{SEPARATOR}` after bucket in `{input}`"
            )));
        }

        let body: Vec<char> = chars.collect();
        let mark = body
            .iter()
            .position(|&c| c == FRACTION_MARK)
            .ok_or_else(|| {
                RankError::Malformed(format!("missing `{FRACTION_MARK}` in `{input}`"))
            })?;
        if mark != codec::INT_WIDTH {
            return Err(RankError::Malformed(format!(
                "integer part must be exactly {} digits in `{input}`",
                codec::INT_WIDTH
            )));
        }

        let mut digits = Vec::with_capacity(body.len() - 1);
        for &symbol in body[..mark].iter().chain(&body[mark + 1..]) {
            let value = codec::digit_value(symbol).ok_or_else(|| {
                RankError::Malformed(format!("symbol `{symbol}` outside alphabet in `{input}`"))
            })?;
            digits.push(value);
        }

        let fraction_len = digits.len() - codec::INT_WIDTH;
        if fraction_len > codec::MAX_FRACTION_DIGITS {
            return Err(RankError::Malformed(format!(
                "fraction longer than {} digits in `{input}`",
                codec::MAX_FRACTION_DIGITS
            )));
        }
        if fraction_len > 0 && digits.last() == Some(&0) {
            return Err(RankError::Malformed(format!(
                "non-canonical trailing zero fraction digit in `{input}`"
            )));
        }

        Ok(Rank { bucket, digits })
    }

    pub(crate) fn from_integer(bucket: Bucket, value: u64) -> Rank {
        Rank {
            bucket,
            digits: codec::int_to_digits(value).to_vec(),
        }
    }

    fn floor_of(bucket: Bucket) -> Rank {
        Rank {
            bucket,
            digits: vec![0; codec::INT_WIDTH],
        }
    }

    fn ceiling_of(bucket: Bucket) -> Rank {
        Rank {
            bucket,
            digits: vec![codec::RADIX - 1; codec::INT_WIDTH],
        }
    }
}

fn midpoint(low: &Rank, high: &Rank) -> RankResult<Rank> {
    let digits = codec::average(&low.digits, &high.digits);
    if digits.len() - codec::INT_WIDTH > codec::MAX_FRACTION_DIGITS {
        return Err(RankError::Exhausted);
    }
    Ok(Rank {
        bucket: low.bucket,
        digits,
    })
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bucket
            .cmp(&other.bucket)
            .then_with(|| codec::compare_padded(&self.digits, &other.digits))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}", self.bucket.value())?;
        for &digit in &self.digits[..codec::INT_WIDTH] {
            write!(f, "{}", codec::digit_symbol(digit))?;
        }
        write!(f, "{FRACTION_MARK}")?;
        for &digit in &self.digits[codec::INT_WIDTH..] {
            write!(f, "{}", codec::digit_symbol(digit))?;
        }
        Ok(())
    }
}

impl FromStr for Rank {
    type Err = RankError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Rank::parse(input)
    }
}
