pub mod base_commands;
pub mod completions_cmd;
pub mod forecast_cmd;
pub mod horizon_cmd;
pub mod report_format;

use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::domain::scope::ScopeRangeError;
use crate::domain::throughput::{ThroughputError, parse_pulse};
use crate::services::burnup_chart::BurnupChartError;
use crate::services::burnup_forecast::BurnupForecastError;
use crate::services::histogram::HistogramError;
use crate::services::pdf_report::PdfReportError;
use crate::services::scope_forecast::ScopeForecastError;
use crate::services::settings::SettingsError;
use crate::services::throughput_source::{ThroughputSourceError, load_throughput_values_or_empty};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Throughput(#[from] ThroughputError),
    #[error(transparent)]
    ThroughputSource(#[from] ThroughputSourceError),
    #[error(transparent)]
    Scope(#[from] ScopeRangeError),
    #[error(transparent)]
    ScopeForecast(#[from] ScopeForecastError),
    #[error(transparent)]
    BurnupForecast(#[from] BurnupForecastError),
    #[error(transparent)]
    Histogram(#[from] HistogramError),
    #[error(transparent)]
    BurnupChart(#[from] BurnupChartError),
    #[error(transparent)]
    PdfReport(#[from] PdfReportError),
    #[error("failed to serialize forecast output: {0}")]
    SerializeYaml(#[from] serde_yaml::Error),
    #[error("failed to serialize forecast output: {0}")]
    SerializeJson(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

/// Weekly counts from either a typed list or a file; neither gives an empty
/// sequence.
pub(crate) fn read_weekly_values(
    manual: Option<&str>,
    file: Option<&str>,
) -> Result<Vec<i64>, CommandError> {
    match (manual, file) {
        (_, Some(path)) => Ok(load_throughput_values_or_empty(path)?),
        (Some(text), None) => Ok(parse_pulse(text)?),
        (None, None) => Ok(Vec::new()),
    }
}

pub(crate) fn data_source_name(file: Option<&str>) -> String {
    match file {
        Some(path) => Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path)
            .to_string(),
        None => "manual entry".to_string(),
    }
}

/// Writes `value` as JSON when `output` ends in `.json`, as YAML otherwise.
pub(crate) fn write_output<T: Serialize>(output: &str, value: &T) -> Result<(), CommandError> {
    let is_json = Path::new(output)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
    let contents = if is_json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_yaml::to_string(value)?
    };
    std::fs::write(output, contents).map_err(|source| CommandError::Write {
        path: output.to_string(),
        source,
    })?;
    info!(path = output, "forecast output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn manual_values_are_parsed() {
        assert_eq!(read_weekly_values(Some("3, 4"), None).unwrap(), vec![3, 4]);
        assert!(matches!(
            read_weekly_values(Some("3, x"), None),
            Err(CommandError::Throughput(_))
        ));
        assert!(read_weekly_values(None, None).unwrap().is_empty());
    }

    #[test]
    fn file_values_take_precedence() {
        let file = assert_fs::NamedTempFile::new("pulse.csv").unwrap();
        file.write_str("weekly\n8\n9\n").unwrap();
        let path = file.path().to_str().unwrap();

        assert_eq!(read_weekly_values(Some("1"), Some(path)).unwrap(), vec![8, 9]);
        assert_eq!(data_source_name(Some(path)), "pulse.csv");
        assert_eq!(data_source_name(None), "manual entry");
    }

    #[test]
    fn output_format_follows_extension() {
        let dir = assert_fs::TempDir::new().unwrap();
        let json = dir.child("report.json");
        let yaml = dir.child("report.yaml");
        let value = serde_json::json!({ "p50": 3.0 });

        write_output(json.path().to_str().unwrap(), &value).unwrap();
        write_output(yaml.path().to_str().unwrap(), &value).unwrap();

        json.assert(predicates::str::contains("\"p50\": 3.0"));
        yaml.assert(predicates::str::contains("p50: 3.0"));
    }
}
