//! Best-effort loader for the synthetic demand sample file.
//!
//! The file is produced by an external generative model and may be absent.
//! Loading never fails: every problem becomes [`SyntheticOutcome::Unavailable`]
//! carrying a notice for the user and the underlying reason.

use std::fs::File;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

/// Notice shown in place of the synthetic demand chart.
pub const SYNTHETIC_UNAVAILABLE_NOTICE: &str =
    "Synthetic demand sample not available. Please upload or generate using the VAE model.";

/// One generated demand sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticColumn {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticSeries {
    pub columns: Vec<SyntheticColumn>,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyntheticOutcome {
    Available { series: SyntheticSeries },
    Unavailable { notice: String, reason: String },
}

impl SyntheticOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Available { .. } => None,
            Self::Unavailable { notice, .. } => Some(notice.as_str()),
        }
    }
}

#[derive(Debug, Error)]
enum SyntheticReadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("file has no columns")]
    NoColumns,
    #[error("file has no data rows")]
    NoRows,
    #[error("line {line}, column '{column}': '{value}' is not a finite number")]
    NotNumeric {
        line: u64,
        column: String,
        value: String,
    },
}

/// Read the synthetic sample, falling back to an `Unavailable` outcome.
pub fn load_synthetic_series(path: &Path) -> SyntheticOutcome {
    match read_series(path) {
        Ok(series) => {
            info!(
                path = %path.display(),
                columns = series.columns.len(),
                rows = series.row_count,
                "synthetic demand sample loaded"
            );
            SyntheticOutcome::Available { series }
        }
        Err(error) => {
            warn!(path = %path.display(), reason = %error, "synthetic demand sample unavailable");
            SyntheticOutcome::Unavailable {
                notice: String::from(SYNTHETIC_UNAVAILABLE_NOTICE),
                reason: error.to_string(),
            }
        }
    }
}

fn read_series(path: &Path) -> Result<SyntheticSeries, SyntheticReadError> {
    let file = File::open(path).map_err(|source| SyntheticReadError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(SyntheticReadError::NoColumns);
    }

    let mut columns: Vec<SyntheticColumn> = headers
        .iter()
        .enumerate()
        .map(|(index, name)| SyntheticColumn {
            name: if name.is_empty() {
                format!("column_{index}")
            } else {
                name.to_owned()
            },
            values: Vec::new(),
        })
        .collect();

    let mut row_count = 0;
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            let value = cell
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| SyntheticReadError::NotNumeric {
                    line,
                    column: column.name.clone(),
                    value: cell.to_owned(),
                })?;
            column.values.push(value);
        }
        row_count += 1;
    }

    if row_count == 0 {
        return Err(SyntheticReadError::NoRows);
    }

    Ok(SyntheticSeries { columns, row_count })
}
