use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::domain::throughput::ThroughputPool;
use crate::services::crossing::find_crossing;
use crate::services::percentiles::{BURNUP_RANKS, PercentileSet, summarize_columns};
use crate::services::simulation_types::{BurnupForecastReport, CrossingWeeks, PercentileBands};

/// Number of future weeks simulated unless configured otherwise.
pub const DEFAULT_HORIZON_WEEKS: usize = 40;

#[derive(Error, Debug, PartialEq)]
pub enum BurnupForecastError {
    #[error("iterations must be greater than zero")]
    InvalidIterations,
    #[error("horizon weeks must be greater than zero")]
    InvalidHorizon,
    #[error("total scope must be a finite, non-negative number: {0}")]
    InvalidTotalScope(f64),
    #[error("project actuals must not be negative: {0}")]
    NegativeActual(i64),
}

/// Cumulative progress per trial and future week, stored row-major:
/// one row per trial, `horizon_weeks` columns per row.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnupBatch {
    horizon_weeks: usize,
    values: Vec<u64>,
}

impl BurnupBatch {
    pub fn trials(&self) -> usize {
        self.values.len() / self.horizon_weeks
    }

    pub fn horizon_weeks(&self) -> usize {
        self.horizon_weeks
    }

    pub fn row(&self, trial: usize) -> Option<&[u64]> {
        let start = trial.checked_mul(self.horizon_weeks)?;
        self.values.get(start..start.checked_add(self.horizon_weeks)?)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.values.chunks_exact(self.horizon_weeks)
    }

    /// Per-week percentiles across all trials.
    pub fn summarize(&self, ranks: &[u8]) -> PercentileSet<Vec<f64>> {
        summarize_columns(&self.values, self.horizon_weeks, ranks)
    }
}

/// Simulates cumulative progress over a fixed horizon of future weeks.
pub struct BurnupForecastEngine<R: Rng> {
    rng: R,
}

impl<R: Rng> BurnupForecastEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Zero draws are kept as they are: a week without progress is part of
    /// the signal here, and the horizon bounds the run.
    pub fn run(
        &mut self,
        pool: &ThroughputPool,
        completed_so_far: u64,
        horizon_weeks: usize,
        trials: usize,
    ) -> Result<BurnupBatch, BurnupForecastError> {
        if trials == 0 {
            return Err(BurnupForecastError::InvalidIterations);
        }
        if horizon_weeks == 0 {
            return Err(BurnupForecastError::InvalidHorizon);
        }

        let mut values = Vec::with_capacity(trials * horizon_weeks);
        for _ in 0..trials {
            let mut cumulative = completed_so_far;
            for _ in 0..horizon_weeks {
                cumulative = cumulative.saturating_add(pool.sample(&mut self.rng));
                values.push(cumulative);
            }
        }
        Ok(BurnupBatch {
            horizon_weeks,
            values,
        })
    }
}

/// Inputs of an active-project forecast.
#[derive(Debug, Clone)]
pub struct BurnupRequest<'a> {
    /// Historical weekly throughput.
    pub pulse: &'a [i64],
    /// Weekly completions of this project so far, oldest first.
    pub actuals: &'a [i64],
    pub total_scope: f64,
    pub horizon_weeks: usize,
    pub iterations: usize,
    pub exclude_zeros: bool,
}

/// Runs the burn-up forecast and locates the week each decision line meets
/// total scope.
///
/// The project's own actuals join the history in the resampling pool. Each
/// decision line is anchored at the current week with the items completed so
/// far before the crossing is located.
pub fn forecast_burnup<R: Rng>(
    request: &BurnupRequest<'_>,
    rng: R,
) -> Result<BurnupForecastReport, BurnupForecastError> {
    if !request.total_scope.is_finite() || request.total_scope < 0.0 {
        return Err(BurnupForecastError::InvalidTotalScope(request.total_scope));
    }
    let actuals = request
        .actuals
        .iter()
        .map(|value| u64::try_from(*value).map_err(|_| BurnupForecastError::NegativeActual(*value)))
        .collect::<Result<Vec<u64>, _>>()?;

    let current_week = actuals.len();
    let completed_so_far: u64 = actuals.iter().sum();
    // The [1] fallback stands in for missing history only; the project's own
    // weeks are appended after it.
    let pool = ThroughputPool::normalize(request.pulse, request.exclude_zeros)
        .extended(request.actuals, request.exclude_zeros);

    debug!(
        current_week,
        completed_so_far,
        total_scope = request.total_scope,
        horizon_weeks = request.horizon_weeks,
        iterations = request.iterations,
        pool_size = pool.len(),
        "running burn-up forecast"
    );

    let batch = BurnupForecastEngine::new(rng).run(
        &pool,
        completed_so_far,
        request.horizon_weeks,
        request.iterations,
    )?;
    let bands = bands_from(batch.summarize(&BURNUP_RANKS));
    let crossings = locate_crossings(&bands, current_week, completed_so_far, request.total_scope);

    Ok(BurnupForecastReport {
        data_source: String::new(),
        current_week,
        completed_so_far,
        total_scope: request.total_scope,
        horizon_weeks: request.horizon_weeks,
        iterations: request.iterations,
        pool_size: pool.len(),
        pulse_preview: pool.preview(),
        degenerate_pool: pool.is_fallback(),
        actuals,
        crossings,
        bands,
    })
}

fn bands_from(percentiles: PercentileSet<Vec<f64>>) -> PercentileBands {
    let mut by_rank = percentiles.into_map();
    let mut take = |rank: u8| by_rank.remove(&rank).unwrap_or_default();
    PercentileBands {
        p5: take(5),
        p15: take(15),
        p25: take(25),
        p50: take(50),
        p75: take(75),
        p85: take(85),
        p95: take(95),
    }
}

fn locate_crossings(
    bands: &PercentileBands,
    current_week: usize,
    completed_so_far: u64,
    total_scope: f64,
) -> CrossingWeeks {
    // A project already at or past its scope is done now. The anchored
    // trajectory would start above the target and never bracket it.
    if completed_so_far as f64 >= total_scope {
        let now = Some(current_week as f64);
        return CrossingWeeks {
            aggressive: now,
            commercial: now,
            safe: now,
        };
    }

    let crossing = |band: &[f64]| {
        let mut trajectory = Vec::with_capacity(band.len() + 1);
        trajectory.push(completed_so_far as f64);
        trajectory.extend_from_slice(band);
        find_crossing(&trajectory, current_week, total_scope)
    };
    CrossingWeeks {
        aggressive: crossing(bands.p50.as_slice()),
        commercial: crossing(bands.p15.as_slice()),
        safe: crossing(bands.p5.as_slice()),
    }
}
