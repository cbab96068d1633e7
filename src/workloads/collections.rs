//! Vector and map workloads.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

/// Builds `0..=200`, shuffles it, sorts it back and inverts it into a
/// value -> position map.
pub fn sort_and_flip(limit: u64) -> u64 {
    let mut rng = rand::thread_rng();
    let mut sum = 0u64;
    for _ in 0..limit {
        let mut a: Vec<u64> = (0..=200).collect();
        a.shuffle(&mut rng);
        a.sort_unstable();
        let flipped: HashMap<u64, u64> = a
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v, i as u64))
            .collect();
        sum += flipped.values().sum::<u64>();
    }
    sum
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub score: u32,
    pub cat: u32,
}

/// Filters 100 random rows to high scores in even categories and sorts them
/// by descending score, once per iteration.
pub fn filter_and_sort(limit: u64) -> Vec<Row> {
    let mut rng = rand::thread_rng();
    let data: Vec<Row> = (0..100)
        .map(|k| Row {
            id: k,
            score: k * rng.gen_range(1..=10),
            cat: k % 5,
        })
        .collect();

    let mut res = Vec::new();
    for _ in 0..limit {
        let mut temp: Vec<Row> = data
            .iter()
            .filter(|row| row.score > 200 && row.cat % 2 == 0)
            .cloned()
            .collect();
        temp.sort_by(|a, b| b.score.cmp(&a.score));
        res = temp;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_positions_sum_is_fixed() {
        // Sorted 0..=200 maps each value to itself.
        assert_eq!(sort_and_flip(1), (0..=200).sum::<u64>());
        assert_eq!(sort_and_flip(3), 3 * (0..=200).sum::<u64>());
    }

    #[test]
    fn filtered_rows_are_sorted_and_match_predicate() {
        let rows = filter_and_sort(2);
        assert!(rows.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(rows.iter().all(|r| r.score > 200 && r.cat % 2 == 0));
        assert!(filter_and_sort(0).is_empty());
    }
}
