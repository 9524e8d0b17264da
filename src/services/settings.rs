use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::services::burnup_forecast::DEFAULT_HORIZON_WEEKS;

pub const DEFAULT_ITERATIONS: usize = 10000;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Simulation settings shared by both forecast modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSettings {
    pub iterations: usize,
    pub horizon_weeks: usize,
    pub exclude_zeros: bool,
    pub seed: Option<u64>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            horizon_weeks: DEFAULT_HORIZON_WEEKS,
            exclude_zeros: false,
            seed: None,
        }
    }
}

/// Partial settings as found in a YAML file or on the command line. Unset
/// fields keep the value of the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsOverrides {
    pub iterations: Option<usize>,
    pub horizon_weeks: Option<usize>,
    pub exclude_zeros: Option<bool>,
    pub seed: Option<u64>,
}

impl SettingsOverrides {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not to a mapping.
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input)
    }
}

impl ForecastSettings {
    pub fn apply(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(iterations) = overrides.iterations {
            self.iterations = iterations;
        }
        if let Some(horizon_weeks) = overrides.horizon_weeks {
            self.horizon_weeks = horizon_weeks;
        }
        if let Some(exclude_zeros) = overrides.exclude_zeros {
            self.exclude_zeros = exclude_zeros;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }

    /// Defaults, then the optional settings file, then the command line.
    pub fn resolve(
        settings_path: Option<&str>,
        cli: &SettingsOverrides,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::default();
        if let Some(path) = settings_path {
            settings = settings.apply(&SettingsOverrides::from_yaml_file(path)?);
        }
        Ok(settings.apply(cli))
    }
}
