//! Digit-level primitives for the base-36 bucket/decimal key encoding.
//!
//! # Responsibility
//! - Map symbols of the fixed alphabet to digit values and back.
//! - Compare and average digit sequences of unequal length.
//!
//! # Invariants
//! - Alphabet order equals numeric order, so string comparison of encoded
//!   keys never disagrees with numeric comparison.
//! - Sequences are conceptually right-padded with the zero symbol; the
//!   canonical form carries no trailing zero digits past the integer part.

use std::cmp::Ordering;

/// Number of symbols in the alphabet (`0-9a-z`).
pub const RADIX: u8 = 36;

/// Fixed width of the integer part of every key.
pub const INT_WIDTH: usize = 6;

/// Safety bound on fractional precision. Subdividing past this length is
/// reported as exhaustion so keys cannot grow without limit.
pub const MAX_FRACTION_DIGITS: usize = 128;

/// Largest value representable in the integer part (`zzzzzz`).
pub const MAX_INT_VALUE: u64 = 36u64.pow(INT_WIDTH as u32) - 1;

/// Returns the digit value of an alphabet symbol, or `None` for symbols
/// outside the alphabet.
pub fn digit_value(symbol: char) -> Option<u8> {
    match symbol {
        '0'..='9' => Some(symbol as u8 - b'0'),
        'a'..='z' => Some(symbol as u8 - b'a' + 10),
        _ => None,
    }
}

/// Returns the alphabet symbol for a digit value below [`RADIX`].
pub fn digit_symbol(value: u8) -> char {
    debug_assert!(value < RADIX);
    if value < 10 {
        (b'0' + value) as char
    } else {
        (b'a' + value - 10) as char
    }
}

/// Compares two digit sequences as if both were right-padded with zeros to
/// equal length.
pub fn compare_padded(a: &[u8], b: &[u8]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let da = a.get(i).copied().unwrap_or(0);
        let db = b.get(i).copied().unwrap_or(0);
        match da.cmp(&db) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

/// Computes the exact average `(a + b) / 2` of two digit sequences.
///
/// The result has at most `max(a.len(), b.len()) + 1` digits: when the sum
/// is odd at the last place, one extension digit (`RADIX / 2`) carries the
/// remaining half. Trailing zeros past the integer part are trimmed, so the
/// result is canonical.
pub fn average(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());

    // Sum most-significant-first, with one overflow slot at the front.
    let mut sum = vec![0u8; len + 1];
    let mut carry = 0u8;
    for i in (0..len).rev() {
        let total = a.get(i).copied().unwrap_or(0) + b.get(i).copied().unwrap_or(0) + carry;
        sum[i + 1] = total % RADIX;
        carry = total / RADIX;
    }
    sum[0] = carry;

    // Halve most-significant-first, pushing the remainder down one place.
    let mut out = Vec::with_capacity(len + 1);
    let mut remainder = 0u16;
    for &digit in &sum {
        let current = remainder * u16::from(RADIX) + u16::from(digit);
        out.push((current / 2) as u8);
        remainder = current % 2;
    }
    // The overflow slot is at most 1 and always halves to zero.
    out.remove(0);
    if remainder == 1 {
        out.push(RADIX / 2);
    }

    trim_fraction(&mut out);
    out
}

/// Expands an integer value into [`INT_WIDTH`] digits, most significant
/// first.
pub fn int_to_digits(value: u64) -> [u8; INT_WIDTH] {
    debug_assert!(value <= MAX_INT_VALUE);
    let mut digits = [0u8; INT_WIDTH];
    let mut rest = value;
    for slot in digits.iter_mut().rev() {
        *slot = (rest % u64::from(RADIX)) as u8;
        rest /= u64::from(RADIX);
    }
    digits
}

fn trim_fraction(digits: &mut Vec<u8>) {
    while digits.len() > INT_WIDTH && digits.last() == Some(&0) {
        digits.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::{average, compare_padded, digit_symbol, digit_value, int_to_digits, MAX_INT_VALUE};
    use std::cmp::Ordering;

    #[test]
    fn alphabet_round_trips_and_orders() {
        for value in 0..36u8 {
            let symbol = digit_symbol(value);
            assert_eq!(digit_value(symbol), Some(value));
        }
        assert!(digit_symbol(9) < digit_symbol(10));
        assert_eq!(digit_value('|'), None);
        assert_eq!(digit_value('A'), None);
    }

    #[test]
    fn padded_compare_treats_missing_digits_as_zero() {
        assert_eq!(compare_padded(&[1, 2], &[1, 2, 0]), Ordering::Equal);
        assert_eq!(compare_padded(&[1, 2], &[1, 2, 1]), Ordering::Less);
        assert_eq!(compare_padded(&[2], &[1, 35]), Ordering::Greater);
    }

    #[test]
    fn average_of_even_gap_stays_at_same_precision() {
        // (4 + 8) / 2 = 6 in the last place.
        let mid = average(&[0, 0, 0, 0, 0, 4], &[0, 0, 0, 0, 0, 8]);
        assert_eq!(mid, vec![0, 0, 0, 0, 0, 6]);
    }

    #[test]
    fn average_of_adjacent_values_extends_precision() {
        // (4 + 5) / 2 = 4.5 -> digit 18 appended.
        let mid = average(&[0, 0, 0, 0, 0, 4], &[0, 0, 0, 0, 0, 5]);
        assert_eq!(mid, vec![0, 0, 0, 0, 0, 4, 18]);
    }

    #[test]
    fn average_trims_trailing_zeros() {
        // 2;10 and 3;26 sum to exactly 6, so the midpoint is the plain
        // integer 3 with no fractional tail left behind.
        let mid = average(&[0, 0, 0, 0, 0, 2, 10], &[0, 0, 0, 0, 0, 3, 26]);
        assert_eq!(mid, vec![0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn int_digits_cover_range_bounds() {
        assert_eq!(int_to_digits(0), [0; 6]);
        assert_eq!(int_to_digits(MAX_INT_VALUE), [35; 6]);
        assert_eq!(int_to_digits(36), [0, 0, 0, 0, 1, 0]);
    }
}
