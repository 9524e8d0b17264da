//! Percentile helpers using linear interpolation between the two nearest
//! ranks (the conventional "linear" method).
//!
//! - Empty input => `None`.
//! - `percentile <= 0` => first element.
//! - `percentile >= 100` => last element.
//! - Otherwise the position `p/100 * (len-1)` is split into a lower index
//!   and a fraction, and the value is interpolated towards the next element.

use std::collections::BTreeMap;

/// Ranks reported by the scope forecast.
pub const SCOPE_RANKS: [u8; 3] = [50, 85, 95];

/// Ranks reported by the burn-up forecast: the fan bands plus the decision
/// lines at 50, 15 and 5.
pub const BURNUP_RANKS: [u8; 7] = [5, 15, 25, 50, 75, 85, 95];

/// Returns the percentile value from a slice that is already sorted in
/// ascending order.
pub fn value_sorted(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    if sorted_values.is_empty() {
        return None;
    }
    let last = sorted_values.len() - 1;
    if percentile <= 0.0 {
        return Some(sorted_values[0]);
    }
    if percentile >= 100.0 {
        return Some(sorted_values[last]);
    }

    let position = (percentile / 100.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    Some(sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction)
}

/// Values at each requested rank, keyed by rank.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileSet<T> {
    values: BTreeMap<u8, T>,
}

impl<T> PercentileSet<T> {
    pub fn get(&self, rank: u8) -> Option<&T> {
        self.values.get(&rank)
    }

    pub fn ranks(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.keys().copied()
    }

    pub fn into_map(self) -> BTreeMap<u8, T> {
        self.values
    }
}

/// Percentiles of a one-dimensional batch of outcomes.
pub fn summarize<I>(outcomes: I, ranks: &[u8]) -> PercentileSet<f64>
where
    I: IntoIterator,
    I::Item: Into<f64>,
{
    let mut sorted: Vec<f64> = outcomes.into_iter().map(Into::into).collect();
    sorted.sort_by(f64::total_cmp);

    let values = ranks
        .iter()
        .map(|rank| (*rank, value_sorted(&sorted, *rank as f64).unwrap_or(0.0)))
        .collect();
    PercentileSet { values }
}

/// Percentiles taken independently per column of a row-major matrix with
/// `columns` entries per row. Produces one vector of length `columns` per rank.
pub fn summarize_columns(matrix: &[u64], columns: usize, ranks: &[u8]) -> PercentileSet<Vec<f64>> {
    let mut per_rank: BTreeMap<u8, Vec<f64>> = ranks
        .iter()
        .map(|rank| (*rank, Vec::with_capacity(columns)))
        .collect();
    if columns == 0 {
        return PercentileSet { values: per_rank };
    }

    let mut column = Vec::with_capacity(matrix.len() / columns);
    for index in 0..columns {
        column.clear();
        column.extend(matrix.iter().skip(index).step_by(columns).map(|v| *v as f64));
        column.sort_by(f64::total_cmp);
        for (rank, band) in per_rank.iter_mut() {
            band.push(value_sorted(&column, *rank as f64).unwrap_or(0.0));
        }
    }
    PercentileSet { values: per_rank }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_sorted_returns_none_for_empty_input() {
        let values: [f64; 0] = [];
        assert_eq!(value_sorted(&values, 50.0), None);
    }

    #[test]
    fn value_sorted_clamps_to_first_and_last() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(value_sorted(&values, -1.0), Some(10.0));
        assert_eq!(value_sorted(&values, 0.0), Some(10.0));
        assert_eq!(value_sorted(&values, 100.0), Some(30.0));
        assert_eq!(value_sorted(&values, 1000.0), Some(30.0));
    }

    #[test]
    fn value_sorted_interpolates_between_neighbours() {
        // len=4 => position = p/100 * 3
        // p50 => 1.5 => halfway between 2 and 3
        // p85 => 2.55 => 3 + 0.55 * (10 - 3)
        let values = [1.0, 2.0, 3.0, 10.0];
        assert_eq!(value_sorted(&values, 50.0), Some(2.5));
        let p85 = value_sorted(&values, 85.0).unwrap();
        assert!((p85 - 6.85).abs() < 1e-9);
    }

    #[test]
    fn summarize_sorts_unordered_outcomes() {
        let set = summarize([5u32, 1, 3, 2, 4], &SCOPE_RANKS);
        assert_eq!(set.get(50), Some(&3.0));
        assert!((set.get(85).unwrap() - 4.4).abs() < 1e-9);
        assert!((set.get(95).unwrap() - 4.8).abs() < 1e-9);
    }

    #[test]
    fn summarize_is_monotonic_in_rank() {
        let outcomes = [9u32, 2, 2, 7, 4, 4, 4, 11, 3, 6, 5];
        let ranks: Vec<u8> = (0..=100).collect();
        let set = summarize(outcomes, &ranks);
        let values: Vec<f64> = ranks.iter().map(|r| *set.get(*r).unwrap()).collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn summarize_is_deterministic() {
        let outcomes = vec![4u32, 8, 15, 16, 23, 42];
        let first = summarize(outcomes.iter().copied(), &SCOPE_RANKS);
        let second = summarize(outcomes.iter().copied(), &SCOPE_RANKS);
        assert_eq!(first, second);
    }

    #[test]
    fn summarize_columns_works_per_column() {
        // 3 trials x 2 weeks
        let matrix = [1, 10, 3, 30, 2, 20];
        let set = summarize_columns(&matrix, 2, &[0, 50, 100]);
        assert_eq!(set.get(0), Some(&vec![1.0, 10.0]));
        assert_eq!(set.get(50), Some(&vec![2.0, 20.0]));
        assert_eq!(set.get(100), Some(&vec![3.0, 30.0]));
        assert_eq!(set.ranks().collect::<Vec<_>>(), vec![0, 50, 100]);
    }
}
