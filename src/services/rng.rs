use rand::SeedableRng;
use rand::rngs::StdRng;

/// Generator handed to the forecasting engines. A seed makes runs
/// reproducible; without one the generator is seeded from system entropy.
pub fn forecast_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
