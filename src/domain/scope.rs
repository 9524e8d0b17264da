use rand_distr::Uniform;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScopeRangeError {
    #[error("invalid scope range: min {min} is greater than max {max}")]
    MinAboveMax { min: u64, max: u64 },
}

/// Backlog-size uncertainty: each trial draws its scope uniformly from
/// `[min, max]`, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeRange {
    min: u64,
    max: u64,
}

impl ScopeRange {
    pub fn new(min: u64, max: u64) -> Result<Self, ScopeRangeError> {
        if min > max {
            return Err(ScopeRangeError::MinAboveMax { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub(crate) fn distribution(&self) -> Uniform<u64> {
        Uniform::new_inclusive(self.min, self.max)
    }
}
