use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScopeForecastReport {
    pub data_source: String,
    pub scope_min: u64,
    pub scope_max: u64,
    pub iterations: usize,
    pub pool_size: usize,
    pub pulse_preview: String,
    pub degenerate_pool: bool,
    pub p50: f64,
    pub p85: f64,
    pub p95: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct ScopeForecastOutput {
    pub report: ScopeForecastReport,
    /// Weeks to completion, one entry per trial.
    pub results: Vec<u32>,
}

/// Per-week cumulative progress at each burn-up rank. Entry `k` is the
/// value `k + 1` weeks after the current week.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct PercentileBands {
    pub p5: Vec<f64>,
    pub p15: Vec<f64>,
    pub p25: Vec<f64>,
    pub p50: Vec<f64>,
    pub p75: Vec<f64>,
    pub p85: Vec<f64>,
    pub p95: Vec<f64>,
}

/// Fractional weeks at which the decision lines reach total scope.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CrossingWeeks {
    /// P50 line, 50% chance.
    pub aggressive: Option<f64>,
    /// P15 line, 85% chance.
    pub commercial: Option<f64>,
    /// P5 line, 95% chance.
    pub safe: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BurnupForecastReport {
    pub data_source: String,
    pub current_week: usize,
    pub completed_so_far: u64,
    pub total_scope: f64,
    pub horizon_weeks: usize,
    pub iterations: usize,
    pub pool_size: usize,
    pub pulse_preview: String,
    pub degenerate_pool: bool,
    pub actuals: Vec<u64>,
    pub crossings: CrossingWeeks,
    pub bands: PercentileBands,
}
