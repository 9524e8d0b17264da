use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::warn;

/// Pool used whenever the caller's history is empty after filtering.
const FALLBACK_POOL: [u64; 1] = [1];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ThroughputError {
    #[error("invalid throughput value: {0:?} (expected a whole number)")]
    InvalidToken(String),
}

/// One week of history as exported by throughput tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throughput {
    pub date: NaiveDate,
    pub completed_issues: usize,
}

/// Historical weekly completions, resampled with replacement by the
/// forecasting engines. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThroughputPool {
    values: Vec<u64>,
    fallback: bool,
}

impl ThroughputPool {
    /// Builds a pool from raw weekly counts.
    ///
    /// Negative counts are never kept. Zeros are kept unless `exclude_zeros`
    /// is set. An empty result is replaced by `[1]` and flagged through
    /// [`ThroughputPool::is_fallback`].
    pub fn normalize(raw_values: &[i64], exclude_zeros: bool) -> Self {
        let values: Vec<u64> = filter_counts(raw_values, exclude_zeros).collect();

        if values.is_empty() {
            warn!(
                raw_len = raw_values.len(),
                exclude_zeros, "throughput pool is empty, falling back to [1]; forecast is unreliable"
            );
            return Self {
                values: FALLBACK_POOL.to_vec(),
                fallback: true,
            };
        }

        Self {
            values,
            fallback: false,
        }
    }

    /// Draws one weekly count uniformly at random, with replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        // `values` is never empty.
        self.values.choose(rng).copied().unwrap_or(FALLBACK_POOL[0])
    }

    /// Appends further weekly counts under the same filter as
    /// [`ThroughputPool::normalize`]. The fallback flag is kept.
    pub fn extended(mut self, raw_values: &[i64], exclude_zeros: bool) -> Self {
        self.values.extend(filter_counts(raw_values, exclude_zeros));
        self
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the caller's data was unusable and `[1]` was substituted.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Short rendering for reports: the first ten values, `...` when longer.
    pub fn preview(&self) -> String {
        format_preview(&self.values)
    }
}

fn filter_counts(raw_values: &[i64], exclude_zeros: bool) -> impl Iterator<Item = u64> + '_ {
    raw_values
        .iter()
        .filter(move |value| if exclude_zeros { **value > 0 } else { **value >= 0 })
        .map(|value| *value as u64)
}

pub(crate) fn format_preview(values: &[u64]) -> String {
    let shown: Vec<String> = values.iter().take(10).map(u64::to_string).collect();
    if values.len() > 10 {
        format!("[{}]...", shown.join(", "))
    } else {
        format!("[{}]", shown.join(", "))
    }
}

/// Parses a manually entered pulse such as `"6, 5, 4"`. Blank entries are
/// skipped.
pub fn parse_pulse(input: &str) -> Result<Vec<i64>, ThroughputError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| ThroughputError::InvalidToken(token.to_string()))
        })
        .collect()
}
