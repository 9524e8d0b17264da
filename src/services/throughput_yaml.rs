use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::throughput::Throughput;

#[derive(Error, Debug)]
pub enum ThroughputYamlError {
    #[error("failed to parse throughput yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid date in throughput yaml: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

#[derive(Deserialize)]
struct ThroughputRecord {
    date: String,
    completed_issues: usize,
}

/// Parses the dated weekly record list:
///
/// ```yaml
/// - date: 2026-01-26
///   completed_issues: 2
/// ```
pub fn deserialize_throughput_from_yaml_str(input: &str) -> Result<Vec<Throughput>, ThroughputYamlError> {
    let records: Vec<ThroughputRecord> = serde_yaml::from_str(input)?;
    records
        .into_iter()
        .map(|record| {
            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .map_err(|_| ThroughputYamlError::InvalidDate(record.date.clone()))?;
            Ok(Throughput {
                date,
                completed_issues: record.completed_issues,
            })
        })
        .collect()
}
