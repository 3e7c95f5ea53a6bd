//! Core contracts for invsight.
//!
//! This crate contains:
//! - Typed dataset schema, CSV/spreadsheet loader and load-once cache
//! - Aggregation passes (KPIs, trends, promotion impact, correlation, turnover)
//! - Optional synthetic demand sample loader and reported forecast metrics
//! - Dashboard assembly
//! - Response envelope, configuration and structured errors

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod source;
pub mod spreadsheet;
pub mod synthetic;
pub mod table;

pub use aggregate::{
    correlation_matrix, inventory_turnover, kpi_summary, monthly_series, monthly_trend,
    promotion_impact, CorrelationMatrix, KpiSummary, MonthlyProductSales, MonthlySales,
    ProductTrend, ProductTurnover, PromotionImpact, TurnoverRatio, MIN_CORRELATION_ROWS,
};
pub use cache::{CachedTable, DatasetCache};
pub use config::{DashboardConfig, DEFAULT_DATASET_FILE, DEFAULT_SYNTHETIC_FILE};
pub use dashboard::{Dashboard, DashboardReport, Panel, Section};
pub use domain::{
    parse_record_date, Feature, ProductName, PromotionStatus, SalesRecord, UtcDateTime, YearMonth,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{InsufficientDataError, LoadError, SelectionError, ValidationError};
pub use forecast::ForecastSummary;
pub use loader::{load_dataset, load_dataset_from_reader, REQUIRED_COLUMNS};
pub use source::SourceId;
pub use spreadsheet::SPREADSHEET_EXTENSIONS;
pub use synthetic::{
    load_synthetic_series, SyntheticColumn, SyntheticOutcome, SyntheticSeries,
    SYNTHETIC_UNAVAILABLE_NOTICE,
};
pub use table::InventoryTable;
