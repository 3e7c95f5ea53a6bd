use std::path::PathBuf;

use thiserror::Error;

/// Validation and contract errors exposed by `invsight-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name cannot be empty")]
    EmptyProductName,
    #[error("product name length {len} exceeds max {max}")]
    ProductNameTooLong { len: usize, max: usize },

    #[error("invalid date '{value}', expected YYYY-MM-DD or M/D/YYYY")]
    InvalidDate { value: String },
    #[error("invalid month '{value}', expected YYYY-MM")]
    InvalidMonth { value: String },

    #[error("promotion flag must be 0 or 1: '{value}'")]
    InvalidPromotionFlag { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failure to turn the primary dataset file into a typed table.
///
/// Always fatal for a render: no section is produced without the core dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "unsupported dataset format '{extension}' for {}; expected csv, xlsx, xlsm, xlsb, xls or ods",
        path.display()
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("failed to read workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("dataset {} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("dataset {} line {line}: {message}", path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

/// The requested product is not part of the loaded table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown product '{requested}'; expected one of: {}", available.join(", "))]
pub struct SelectionError {
    pub requested: String,
    pub available: Vec<String>,
}

/// Too few rows for a statistic that needs at least `required`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("correlation needs at least {required} rows, table has {rows}")]
pub struct InsufficientDataError {
    pub rows: usize,
    pub required: usize,
}
