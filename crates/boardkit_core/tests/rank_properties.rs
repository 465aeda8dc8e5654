use boardkit_core::{rank_for_insert_at, rebalance, sort_ascending, InsertPosition, Rank, RankError};
use uuid::Uuid;

fn fixed_id(tail: u32) -> Uuid {
    Uuid::parse_str(&format!("00000000-0000-4000-8000-{tail:012}")).unwrap()
}

/// Builds a rank with the maximum allowed fractional precision, ending in
/// `last` so adjacent pairs can be constructed.
fn maxed_fraction_rank(last: char) -> Rank {
    let mut text = String::from("0|hzzzzz:");
    for _ in 0..127 {
        text.push('1');
    }
    text.push(last);
    Rank::parse(&text).unwrap()
}

#[test]
fn ordering_is_transitive_and_agrees_with_string_comparison() {
    // Subdivide the range repeatedly to collect ranks of mixed precision.
    let mut ranks = vec![
        Rank::parse("0|000001:").unwrap(),
        Rank::middle(),
        Rank::parse("0|zzzzzy:").unwrap(),
    ];
    for _ in 0..6 {
        let mut next_wave = Vec::new();
        for pair in ranks.windows(2) {
            next_wave.push(Rank::between(Some(&pair[0]), Some(&pair[1])).unwrap());
        }
        ranks.extend(next_wave);
        ranks.sort();
    }

    for a in &ranks {
        for b in &ranks {
            assert_eq!(
                a.cmp(b),
                a.to_string().cmp(&b.to_string()),
                "Ord disagrees with string order for {a} vs {b}"
            );
        }
    }
    for window in ranks.windows(3) {
        if window[0] < window[1] && window[1] < window[2] {
            assert!(window[0] < window[2]);
        }
    }
}

#[test]
fn midpoint_sorts_strictly_between_its_neighbors() {
    let low = Rank::parse("0|hzzzzz:").unwrap();
    let high = Rank::parse("0|i00003:").unwrap();
    let mid = Rank::between(Some(&low), Some(&high)).unwrap();

    assert!(low < mid && mid < high);
    let (low_s, mid_s, high_s) = (low.to_string(), mid.to_string(), high.to_string());
    assert!(low_s < mid_s && mid_s < high_s);
}

#[test]
fn middle_is_reproducible() {
    assert_eq!(Rank::between(None, None).unwrap(), Rank::middle());
    assert_eq!(Rank::middle().to_string(), Rank::middle().to_string());
}

#[test]
fn repeated_insertion_at_one_spot_grows_keys_logarithmically() {
    let low = Rank::parse("0|hzzzzz:").unwrap();
    let mut tightest = Rank::parse("0|i00003:").unwrap();

    for _ in 0..100 {
        let inserted = Rank::between(Some(&low), Some(&tightest)).unwrap();
        assert!(low < inserted && inserted < tightest);
        tightest = inserted;
    }

    // One fractional digit covers ~5 halvings (2^5 < 36), so 100 insertions
    // need roughly 20 extra digits, nowhere near 100.
    assert!(
        tightest.to_string().len() <= 40,
        "key grew to {} chars: {tightest}",
        tightest.to_string().len()
    );
}

#[test]
fn parse_format_round_trips_fractional_ranks() {
    let low = Rank::parse("0|hzzzzz:").unwrap();
    let mut current = Rank::parse("0|i00000:").unwrap();
    for _ in 0..20 {
        current = Rank::between(Some(&low), Some(&current)).unwrap();
        assert_eq!(Rank::parse(&current.to_string()).unwrap(), current);
    }
}

#[test]
fn exhaustion_is_recovered_by_rebalancing_the_group() {
    let a = maxed_fraction_rank('1');
    let b = maxed_fraction_rank('2');
    assert!(a < b);
    assert_eq!(Rank::between(Some(&a), Some(&b)), Err(RankError::Exhausted));

    let group = vec![(fixed_id(1), a), (fixed_id(2), b)];
    let fresh = rebalance(&group).unwrap();
    assert_eq!(fresh.len(), 2);

    let mid = Rank::between(Some(&fresh[0].1), Some(&fresh[1].1)).unwrap();
    assert!(fresh[0].1 < mid && mid < fresh[1].1);
}

#[test]
fn rebalance_then_sort_preserves_the_input_order() {
    let texts = ["0|hzzzzz:", "0|hzzzzz:i", "0|i00000:", "0|000001:"];
    let group: Vec<(Uuid, Rank)> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| (fixed_id(i as u32), Rank::parse(text).unwrap()))
        .collect();

    let mut fresh = rebalance(&group).unwrap();
    sort_ascending(&mut fresh);

    let ids_in: Vec<Uuid> = group.iter().map(|(id, _)| *id).collect();
    let ids_out: Vec<Uuid> = fresh.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids_in, ids_out);
}

#[test]
fn insert_scenario_start_end_before() {
    let first = rank_for_insert_at(&[], InsertPosition::Start).unwrap();
    assert_eq!(first, Rank::middle());

    let first_id = fixed_id(1);
    let group = vec![(first_id, first.clone())];
    let second = rank_for_insert_at(&group, InsertPosition::End).unwrap();
    assert!(second > first);

    let second_id = fixed_id(2);
    let group = vec![(first_id, first.clone()), (second_id, second.clone())];
    let third = rank_for_insert_at(&group, InsertPosition::Before(second_id)).unwrap();
    assert!(first < third && third < second);
}
