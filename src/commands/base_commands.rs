use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::services::settings::{ForecastSettings, SettingsError, SettingsOverrides};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast how many weeks a backlog range takes (pre-project)
    Forecast {
        /// Smallest plausible backlog size (best case)
        #[arg(long)]
        min: u64,
        /// Largest plausible backlog size (worst case)
        #[arg(long)]
        max: u64,
        #[command(flatten)]
        pulse: PulseArgs,
        /// Output report file (.yaml or .json); the histogram goes to <output>.png
        #[arg(short, long)]
        output: String,
        #[command(flatten)]
        simulation: SimulationArgs,
    },
    /// Forecast when an active project crosses its total scope (burn-up)
    Horizon {
        #[command(flatten)]
        pulse: PulseArgs,
        /// Weekly completions of this project so far, comma separated
        #[arg(short, long, conflicts_with = "actuals_file")]
        actuals: Option<String>,
        /// CSV or YAML file with the weekly completions of this project so far
        #[arg(long)]
        actuals_file: Option<String>,
        /// Total number of items in scope
        #[arg(short, long)]
        total_scope: f64,
        /// Number of future weeks to simulate [default: 40]
        #[arg(long)]
        horizon_weeks: Option<usize>,
        /// Output report file (.yaml or .json); the chart goes to <output>.png
        #[arg(short, long)]
        output: String,
        #[command(flatten)]
        simulation: SimulationArgs,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Historical weekly throughput, typed in or read from a file.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PulseArgs {
    /// Weekly throughput history, comma separated (e.g. "6,5,4,6")
    #[arg(short, long)]
    pub pulse: Option<String>,
    /// CSV (first column) or YAML file with the weekly throughput history
    #[arg(short = 'f', long)]
    pub pulse_file: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SimulationArgs {
    /// Number of simulation iterations [default: 10000]
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,
    /// Ignore weeks without completed items
    #[arg(long)]
    pub exclude_zeros: bool,
    /// Keep weeks without completed items, even if the settings file excludes them
    #[arg(long, conflicts_with = "exclude_zeros")]
    pub include_zeros: bool,
    /// Seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
    /// YAML settings file (iterations, horizon_weeks, exclude_zeros, seed)
    #[arg(long)]
    pub settings: Option<String>,
}

impl SimulationArgs {
    pub fn resolve(&self, horizon_weeks: Option<usize>) -> Result<ForecastSettings, SettingsError> {
        let overrides = SettingsOverrides {
            iterations: self.iterations,
            horizon_weeks,
            exclude_zeros: match (self.exclude_zeros, self.include_zeros) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            seed: self.seed,
        };
        ForecastSettings::resolve(self.settings.as_deref(), &overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn forecast_uses_default_settings() {
        let args = CliArgs::parse_from([
            "delivery-forecast",
            "forecast",
            "--min",
            "12",
            "--max",
            "17",
            "-p",
            "6,5,4",
            "-o",
            "output.yaml",
        ]);

        if let Commands::Forecast { simulation, .. } = args.command {
            let settings = simulation.resolve(None).unwrap();
            assert_eq!(settings, ForecastSettings::default());
        } else {
            panic!("expected forecast command");
        }
    }

    #[test]
    fn horizon_flags_override_defaults() {
        let args = CliArgs::parse_from([
            "delivery-forecast",
            "horizon",
            "-f",
            "pulse.csv",
            "-a",
            "2,5,4",
            "-t",
            "100",
            "--horizon-weeks",
            "30",
            "-n",
            "500",
            "--exclude-zeros",
            "--seed",
            "3",
            "-o",
            "output.yaml",
        ]);

        if let Commands::Horizon {
            pulse,
            actuals,
            total_scope,
            horizon_weeks,
            simulation,
            ..
        } = args.command
        {
            assert_eq!(pulse.pulse_file.as_deref(), Some("pulse.csv"));
            assert_eq!(actuals.as_deref(), Some("2,5,4"));
            assert_eq!(total_scope, 100.0);
            let settings = simulation.resolve(horizon_weeks).unwrap();
            assert_eq!(
                settings,
                ForecastSettings {
                    iterations: 500,
                    horizon_weeks: 30,
                    exclude_zeros: true,
                    seed: Some(3),
                }
            );
        } else {
            panic!("expected horizon command");
        }
    }

    #[test]
    fn include_zeros_overrides_the_settings_file() {
        let file = assert_fs::NamedTempFile::new("settings.yaml").unwrap();
        file.write_str("exclude_zeros: true\n").unwrap();
        let settings_path = file.path().to_str().unwrap();

        let parse = |extra: &[&str]| {
            let mut argv = vec![
                "delivery-forecast",
                "forecast",
                "--min",
                "1",
                "--max",
                "2",
                "-p",
                "1,0",
                "-o",
                "output.yaml",
                "--settings",
                settings_path,
            ];
            argv.extend_from_slice(extra);
            match CliArgs::parse_from(argv).command {
                Commands::Forecast { simulation, .. } => simulation.resolve(None).unwrap(),
                _ => panic!("expected forecast command"),
            }
        };

        assert!(parse(&[]).exclude_zeros);
        assert!(!parse(&["--include-zeros"]).exclude_zeros);
    }

    #[test]
    fn zero_flags_are_exclusive() {
        let result = CliArgs::try_parse_from([
            "delivery-forecast",
            "forecast",
            "--min",
            "1",
            "--max",
            "2",
            "-p",
            "1",
            "-o",
            "output.yaml",
            "--exclude-zeros",
            "--include-zeros",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn pulse_is_required() {
        let result = CliArgs::try_parse_from([
            "delivery-forecast",
            "forecast",
            "--min",
            "1",
            "--max",
            "2",
            "-o",
            "output.yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn pulse_sources_are_exclusive() {
        let result = CliArgs::try_parse_from([
            "delivery-forecast",
            "forecast",
            "--min",
            "1",
            "--max",
            "2",
            "-p",
            "1,2",
            "-f",
            "pulse.csv",
            "-o",
            "output.yaml",
        ]);
        assert!(result.is_err());
    }
}
