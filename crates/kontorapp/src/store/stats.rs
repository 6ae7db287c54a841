//! Aggregate helpers shared by the per-domain stats structs: grouped counts
//! and divide-by-zero-guarded averages over small in-memory collections.

use std::collections::BTreeMap;

/// Count records per group value. `BTreeMap` keeps the output deterministic.
pub fn count_by<T, F>(records: &[T], group: F) -> BTreeMap<String, usize>
where
    F: Fn(&T) -> String,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(group(record)).or_insert(0) += 1;
    }
    counts
}

/// Sum a numeric field over records passing a predicate.
pub fn sum_where<T, P, F>(records: &[T], predicate: P, value: F) -> f64
where
    P: Fn(&T) -> bool,
    F: Fn(&T) -> f64,
{
    records
        .iter()
        .filter(|r| predicate(r))
        .map(|r| value(r))
        .sum()
}

/// Average guarded against empty input: an empty collection averages to zero.
pub fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_by_groups_values() {
        let data = vec!["a", "b", "a", "a"];
        let counts = count_by(&data, |s| s.to_string());
        assert_eq!(counts["a"], 3);
        assert_eq!(counts["b"], 1);
        assert_eq!(counts.values().sum::<usize>(), data.len());
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average(0.0, 0), 0.0);
        assert_eq!(average(9.0, 3), 3.0);
    }

    #[test]
    fn sum_where_respects_predicate() {
        let data = vec![(true, 2.0), (false, 5.0), (true, 3.0)];
        let total = sum_where(&data, |d| d.0, |d| d.1);
        assert_eq!(total, 5.0);
    }
}
