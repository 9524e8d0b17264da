use std::io;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use thiserror::Error;
use tracing::{debug, warn};

use crate::services::throughput_yaml::{ThroughputYamlError, deserialize_throughput_from_yaml_str};

#[derive(Error, Debug)]
pub enum ThroughputSourceError {
    #[error("failed to read throughput file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse throughput csv {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("invalid throughput value {value:?} on line {line} of {path}")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        value: String,
    },
    #[error("failed to load throughput yaml {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: ThroughputYamlError,
    },
    #[error("failed to read throughput spreadsheet {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        source: calamine::Error,
    },
    #[error("throughput spreadsheet {0} has no worksheet")]
    NoWorksheet(PathBuf),
    #[error("unsupported throughput file format: {0} (expected .csv, .xlsx, .xls, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Spreadsheet,
    Yaml,
}

fn source_format(path: &Path) -> Option<SourceFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "csv" => Some(SourceFormat::Csv),
        "xlsx" | "xls" => Some(SourceFormat::Spreadsheet),
        "yaml" | "yml" => Some(SourceFormat::Yaml),
        _ => None,
    }
}

/// Reads weekly counts from a throughput file, in file order.
///
/// `.csv` files and the first sheet of `.xlsx`/`.xls` workbooks contribute
/// the first column of every row after the header. `.yaml`/`.yml` files hold
/// the dated record list.
pub fn load_throughput_values<P: AsRef<Path>>(path: P) -> Result<Vec<i64>, ThroughputSourceError> {
    let path = path.as_ref();
    let format =
        source_format(path).ok_or_else(|| ThroughputSourceError::UnsupportedFormat(path.to_path_buf()))?;

    let values = match format {
        SourceFormat::Csv => read_csv_first_column(read_text(path)?.as_bytes(), path)?,
        SourceFormat::Spreadsheet => read_spreadsheet_first_column(path)?,
        SourceFormat::Yaml => deserialize_throughput_from_yaml_str(&read_text(path)?)
            .map_err(|source| ThroughputSourceError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
            .iter()
            .map(|record| record.completed_issues as i64)
            .collect(),
    };
    debug!(path = %path.display(), weeks = values.len(), "loaded throughput values");
    Ok(values)
}

/// Like [`load_throughput_values`], but a file that cannot be read or parsed
/// yields an empty sequence so the pool falls back to `[1]`. Unsupported
/// formats are still reported.
pub fn load_throughput_values_or_empty<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<i64>, ThroughputSourceError> {
    match load_throughput_values(path) {
        Ok(values) => Ok(values),
        Err(error @ ThroughputSourceError::UnsupportedFormat(_)) => Err(error),
        Err(error) => {
            warn!("{error}; continuing without data from this file");
            Ok(Vec::new())
        }
    }
}

fn read_text(path: &Path) -> Result<String, ThroughputSourceError> {
    std::fs::read_to_string(path).map_err(|source| ThroughputSourceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_spreadsheet_first_column(path: &Path) -> Result<Vec<i64>, ThroughputSourceError> {
    let spreadsheet_error = |source| ThroughputSourceError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ThroughputSourceError::NoWorksheet(path.to_path_buf()))?
        .map_err(spreadsheet_error)?;
    let first_row = range.start().map_or(0, |(row, _)| u64::from(row));

    let mut values = Vec::new();
    for (index, row) in range.rows().enumerate().skip(1) {
        let value = match row.first() {
            None | Some(Data::Empty) => continue,
            Some(Data::String(text)) if text.trim().is_empty() => continue,
            Some(Data::Int(value)) => Some(*value),
            Some(Data::Float(value)) => integral(*value),
            Some(Data::String(text)) => parse_count(text.trim()),
            Some(_) => None,
        };
        let value = value.ok_or_else(|| ThroughputSourceError::InvalidValue {
            path: path.to_path_buf(),
            line: first_row + index as u64 + 1,
            value: row.first().map(ToString::to_string).unwrap_or_default(),
        })?;
        values.push(value);
    }
    Ok(values)
}

fn read_csv_first_column<R: io::Read>(reader: R, path: &Path) -> Result<Vec<i64>, ThroughputSourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| ThroughputSourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(cell) = record.get(0).filter(|cell| !cell.is_empty()) else {
            continue;
        };
        let value = parse_count(cell).ok_or_else(|| ThroughputSourceError::InvalidValue {
            path: path.to_path_buf(),
            line: record.position().map_or(0, |position| position.line()),
            value: cell.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Whole numbers, also when a spreadsheet exported them as `5.0`.
fn parse_count(cell: &str) -> Option<i64> {
    if let Ok(value) = cell.parse::<i64>() {
        return Some(value);
    }
    integral(cell.parse::<f64>().ok()?)
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}
