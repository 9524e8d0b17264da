use rand::Rng;
use rand_distr::Distribution;
use thiserror::Error;
use tracing::debug;

use crate::domain::scope::ScopeRange;
use crate::domain::throughput::ThroughputPool;
use crate::services::percentiles::{SCOPE_RANKS, summarize};
use crate::services::simulation_types::{ScopeForecastOutput, ScopeForecastReport};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScopeForecastError {
    #[error("iterations must be greater than zero")]
    InvalidIterations,
}

/// Simulates how many weeks a randomly sized backlog takes to burn down.
pub struct ScopeForecastEngine<R: Rng> {
    rng: R,
}

impl<R: Rng> ScopeForecastEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Runs `trials` independent trials and returns the weeks each one took.
    pub fn run(
        &mut self,
        scope: &ScopeRange,
        pool: &ThroughputPool,
        trials: usize,
    ) -> Result<Vec<u32>, ScopeForecastError> {
        if trials == 0 {
            return Err(ScopeForecastError::InvalidIterations);
        }

        let scope_distribution = scope.distribution();
        let mut results = Vec::with_capacity(trials);
        for _ in 0..trials {
            let backlog = scope_distribution.sample(&mut self.rng);
            results.push(simulate_single_run(backlog, pool, &mut self.rng));
        }
        Ok(results)
    }
}

fn simulate_single_run<R: Rng + ?Sized>(backlog: u64, pool: &ThroughputPool, rng: &mut R) -> u32 {
    let mut remaining = backlog;
    let mut weeks = 0u32;
    while remaining > 0 {
        // A zero week would never finish the loop; count it as one item.
        let velocity = pool.sample(rng).max(1);
        remaining = remaining.saturating_sub(velocity);
        weeks = weeks.saturating_add(1);
    }
    weeks
}

/// Runs the scope forecast and reduces it to the P50/P85/P95 decision menu.
pub fn forecast_scope<R: Rng>(
    scope: &ScopeRange,
    pool: &ThroughputPool,
    iterations: usize,
    rng: R,
) -> Result<ScopeForecastOutput, ScopeForecastError> {
    debug!(
        scope_min = scope.min(),
        scope_max = scope.max(),
        pool_size = pool.len(),
        iterations,
        "running scope forecast"
    );
    let results = ScopeForecastEngine::new(rng).run(scope, pool, iterations)?;
    let percentiles = summarize(results.iter().copied(), &SCOPE_RANKS);
    let at = |rank| percentiles.get(rank).copied().unwrap_or(0.0);

    let report = ScopeForecastReport {
        data_source: String::new(),
        scope_min: scope.min(),
        scope_max: scope.max(),
        iterations,
        pool_size: pool.len(),
        pulse_preview: pool.preview(),
        degenerate_pool: pool.is_fallback(),
        p50: at(50),
        p85: at(85),
        p95: at(95),
    };
    Ok(ScopeForecastOutput { report, results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine(seed: u64) -> ScopeForecastEngine<StdRng> {
        ScopeForecastEngine::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn constant_pool_and_scope_give_exact_weeks() {
        let pool = ThroughputPool::normalize(&[5, 5, 5, 5, 5], false);
        let scope = ScopeRange::new(10, 10).unwrap();
        let results = engine(1).run(&scope, &pool, 1000).unwrap();
        assert_eq!(results.len(), 1000);
        assert!(results.iter().all(|weeks| *weeks == 2));
    }

    #[test]
    fn fallback_pool_burns_one_item_per_week() {
        let pool = ThroughputPool::normalize(&[], false);
        let scope = ScopeRange::new(3, 3).unwrap();
        let results = engine(2).run(&scope, &pool, 200).unwrap();
        assert!(results.iter().all(|weeks| *weeks == 3));
    }

    #[test]
    fn empty_scope_finishes_immediately() {
        let pool = ThroughputPool::normalize(&[4, 2], false);
        let scope = ScopeRange::new(0, 0).unwrap();
        let results = engine(3).run(&scope, &pool, 50).unwrap();
        assert!(results.iter().all(|weeks| *weeks == 0));
    }

    #[test]
    fn zero_draws_still_make_progress() {
        let pool = ThroughputPool::normalize(&[0], false);
        let scope = ScopeRange::new(4, 4).unwrap();
        let results = engine(4).run(&scope, &pool, 10).unwrap();
        assert!(results.iter().all(|weeks| *weeks == 4));
    }

    #[test]
    fn outcomes_stay_within_scope_bounds() {
        // With draws of 1..=3, a backlog of 6..=9 takes between 2 and 9 weeks.
        let pool = ThroughputPool::normalize(&[1, 2, 3], false);
        let scope = ScopeRange::new(6, 9).unwrap();
        let results = engine(5).run(&scope, &pool, 2000).unwrap();
        assert!(results.iter().all(|weeks| (2..=9).contains(weeks)));
    }

    #[test]
    fn rejects_zero_trials() {
        let pool = ThroughputPool::normalize(&[1], false);
        let scope = ScopeRange::new(1, 2).unwrap();
        assert_eq!(
            engine(6).run(&scope, &pool, 0),
            Err(ScopeForecastError::InvalidIterations)
        );
    }

    #[test]
    fn same_seed_repeats_the_batch() {
        let pool = ThroughputPool::normalize(&[6, 5, 4, 6, 3, 6, 5, 4, 7], false);
        let scope = ScopeRange::new(12, 17).unwrap();
        let first = engine(42).run(&scope, &pool, 500).unwrap();
        let second = engine(42).run(&scope, &pool, 500).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn forecast_scope_reports_ordered_percentiles() {
        let pool = ThroughputPool::normalize(&[6, 5, 4, 6, 3, 6, 5, 4, 7], false);
        let scope = ScopeRange::new(12, 17).unwrap();
        let output = forecast_scope(&scope, &pool, 5000, StdRng::seed_from_u64(8)).unwrap();

        let report = &output.report;
        assert_eq!(output.results.len(), 5000);
        assert_eq!(report.iterations, 5000);
        assert_eq!((report.scope_min, report.scope_max), (12, 17));
        assert_eq!(report.pool_size, 9);
        assert!(!report.degenerate_pool);
        assert!(report.p50 <= report.p85);
        assert!(report.p85 <= report.p95);
        // 12..=17 items at 3..=7 per week needs 2 to 6 weeks.
        assert!(report.p50 >= 2.0 && report.p95 <= 6.0);
    }

    #[test]
    fn forecast_scope_flags_degenerate_pool() {
        let pool = ThroughputPool::normalize(&[0, 0], true);
        let scope = ScopeRange::new(3, 3).unwrap();
        let output = forecast_scope(&scope, &pool, 10, StdRng::seed_from_u64(9)).unwrap();
        assert!(output.report.degenerate_pool);
        assert_eq!(output.report.p50, 3.0);
        assert_eq!(output.report.p95, 3.0);
    }
}
