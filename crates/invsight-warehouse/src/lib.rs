//! # invsight warehouse
//!
//! DuckDB-backed analytical copy of the sales/inventory dataset.
//!
//! The in-memory pipeline in `invsight-core` is the source of truth for the
//! dashboard. The warehouse mirrors loaded rows into an in-memory DuckDB
//! database so they can be explored with ad-hoc SQL through a set of prepared
//! views. Nothing is written to disk; the copy lives as long as the
//! [`Warehouse`] handle.
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `sales_records` | One row per dataset row, keyed by dataset name and row number |
//! | `ingest_log` | One row per ingest |
//! | `schema_migrations` | Applied migration versions |
//!
//! ## Views
//!
//! | View | Description |
//! |------|-------------|
//! | `vw_monthly_sales` | Monthly sales per product |
//! | `vw_promotion_impact` | Mean sales with and without promotion |
//! | `vw_inventory_turnover` | Total sales over mean stock level |
//! | `vw_kpi_summary` | Headline totals |
//!
//! ## Query guardrails
//!
//! ```rust,no_run
//! use invsight_warehouse::{QueryGuardrails, Warehouse, WarehouseConfig};
//!
//! let warehouse = Warehouse::open(WarehouseConfig::default())?;
//! let result = warehouse.execute_query(
//!     "SELECT * FROM vw_kpi_summary",
//!     QueryGuardrails::default(),
//!     false,
//! )?;
//! println!("{} rows", result.row_count);
//! # Ok::<(), invsight_warehouse::WarehouseError>(())
//! ```

pub mod duckdb;
pub mod migrations;
pub mod views;

use std::time::{Duration, Instant};

use ::duckdb::types::Value as DuckValue;
use ::duckdb::{Connection, Statement, ToSql};
use serde::Serialize;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::{debug, info};

pub use duckdb::{AccessMode, DuckDbConnectionManager, PooledConnection};

/// Days between the Julian day epoch and 1970-01-01.
const UNIX_EPOCH_JULIAN_DAY: i32 = 2_440_588;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// Query was rejected by policy before reaching the database.
    #[error("query rejected: {0}")]
    QueryRejected(String),

    #[error("query timed out after {timeout_ms}ms")]
    QueryTimeout { timeout_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Maximum idle connections kept per access mode.
    pub max_pool_size: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self { max_pool_size: 4 }
    }
}

/// Limits applied to ad-hoc queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryGuardrails {
    pub max_rows: usize,
    pub query_timeout_ms: u64,
}

impl Default for QueryGuardrails {
    fn default() -> Self {
        Self {
            max_rows: 10_000,
            query_timeout_ms: 5_000,
        }
    }
}

impl QueryGuardrails {
    fn timeout(self) -> Duration {
        Duration::from_millis(self.query_timeout_ms.max(1))
    }

    fn validate(self) -> Result<(), WarehouseError> {
        if self.max_rows == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "--max-rows must be greater than zero",
            )));
        }
        if self.query_timeout_ms == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "--query-timeout-ms must be greater than zero",
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<SqlColumn>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    /// Whether rows were dropped to honor `max_rows`.
    pub truncated: bool,
}

/// One dataset row in warehouse form.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub product: String,
    pub sales: f64,
    pub stock_level: f64,
    pub supplier_lead_time: f64,
    pub price_per_unit: f64,
    pub weather_index: f64,
    pub promotion: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub dataset: String,
    pub request_id: String,
    pub rows_written: usize,
    pub latency_ms: u64,
}

#[derive(Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open an empty in-memory warehouse with tables and views in place.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        let manager = DuckDbConnectionManager::open_in_memory(config.max_pool_size)?;
        let warehouse = Self { config, manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Apply pending migrations and refresh views.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadWrite)?;
        migrations::apply_migrations(&connection)?;
        views::create_views(&connection)?;
        debug!(max_pool_size = self.config.max_pool_size, "warehouse initialized");
        Ok(())
    }

    pub fn config(&self) -> WarehouseConfig {
        self.config
    }

    /// Run `sql` under `guardrails`.
    ///
    /// Unless `allow_write` is set, only a single SELECT, WITH, EXPLAIN, SHOW
    /// or DESCRIBE statement is accepted.
    pub fn execute_query(
        &self,
        sql: &str,
        guardrails: QueryGuardrails,
        allow_write: bool,
    ) -> Result<QueryResult, WarehouseError> {
        guardrails.validate()?;
        let sql = normalize_sql(sql)?;

        if !allow_write {
            enforce_read_only_query(sql)?;
        }

        let mode = if allow_write {
            AccessMode::ReadWrite
        } else {
            AccessMode::ReadOnly
        };
        let connection = self.manager.acquire(mode)?;
        execute_with_guardrails(&connection, sql, guardrails, allow_write)
    }

    /// Replace every row stored under `dataset` with `rows`.
    ///
    /// Delete, inserts and the `ingest_log` entry run in one transaction;
    /// on any failure the previous rows stay in place. All values are bound
    /// as parameters.
    pub fn ingest_records(
        &self,
        dataset: &str,
        request_id: &str,
        rows: &[SalesRow],
    ) -> Result<IngestReport, WarehouseError> {
        let dataset = dataset.trim();
        if dataset.is_empty() {
            return Err(WarehouseError::QueryRejected(String::from(
                "dataset name must not be empty",
            )));
        }

        let started = Instant::now();
        let connection = self.manager.acquire(AccessMode::ReadWrite)?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<u64, WarehouseError> {
            connection.execute("DELETE FROM sales_records WHERE dataset = ?", [dataset])?;

            let mut insert = connection.prepare(
                "INSERT INTO sales_records \
                 (dataset, row_number, date, product, sales, stock_level, \
                  supplier_lead_time, price_per_unit, weather_index, promotion) \
                 VALUES (?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for (index, row) in rows.iter().enumerate() {
                let row_number = index as i64 + 1;
                let params: [&dyn ToSql; 10] = [
                    &dataset,
                    &row_number,
                    &row.date,
                    &row.product,
                    &row.sales,
                    &row.stock_level,
                    &row.supplier_lead_time,
                    &row.price_per_unit,
                    &row.weather_index,
                    &row.promotion,
                ];
                insert.execute(params.as_slice())?;
            }

            let latency_ms = elapsed_ms(started);
            let row_count = rows.len() as i64;
            let params: [&dyn ToSql; 4] = [&request_id, &dataset, &row_count, &latency_ms];
            connection.execute(
                "INSERT INTO ingest_log \
                 (request_id, dataset, status, row_count, latency_ms, timestamp) \
                 VALUES (?, ?, 'ok', ?, ?, CURRENT_TIMESTAMP)",
                params.as_slice(),
            )?;

            Ok(latency_ms)
        })();

        let latency_ms = finalize_transaction(&connection, result)?;
        info!(dataset, request_id, rows = rows.len(), latency_ms, "warehouse ingest committed");

        Ok(IngestReport {
            dataset: dataset.to_owned(),
            request_id: request_id.to_owned(),
            rows_written: rows.len(),
            latency_ms,
        })
    }
}

fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            // The original error is more useful than a failed rollback.
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn execute_with_guardrails(
    connection: &Connection,
    sql: &str,
    guardrails: QueryGuardrails,
    allow_write: bool,
) -> Result<QueryResult, WarehouseError> {
    let started = Instant::now();
    if is_select_like(sql) {
        execute_select_query(connection, sql, guardrails, started)
    } else if allow_write {
        connection.execute_batch(sql)?;
        ensure_timeout(started, guardrails.timeout())?;
        Ok(QueryResult {
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            truncated: false,
        })
    } else {
        Err(WarehouseError::QueryRejected(String::from(
            "only SELECT/CTE queries are allowed unless --write is provided",
        )))
    }
}

fn execute_select_query(
    connection: &Connection,
    sql: &str,
    guardrails: QueryGuardrails,
    started: Instant,
) -> Result<QueryResult, WarehouseError> {
    let mut statement = connection.prepare(sql)?;
    let mut cursor = statement.query([])?;
    ensure_timeout(started, guardrails.timeout())?;

    // Column metadata is only populated once the statement has run.
    let columns = match cursor.as_ref() {
        Some(statement) => column_metadata(statement)?,
        None => Vec::new(),
    };
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut truncated = false;

    while let Some(row) = cursor.next()? {
        ensure_timeout(started, guardrails.timeout())?;

        if rows.len() >= guardrails.max_rows {
            truncated = true;
            break;
        }

        rows.push(read_row(row, column_count)?);
    }

    ensure_timeout(started, guardrails.timeout())?;

    Ok(QueryResult {
        columns,
        row_count: rows.len(),
        rows,
        truncated,
    })
}

fn column_metadata(statement: &Statement<'_>) -> Result<Vec<SqlColumn>, ::duckdb::Error> {
    (0..statement.column_count())
        .map(|index| {
            Ok(SqlColumn {
                name: statement.column_name(index)?.to_string(),
                r#type: statement.column_type(index).to_string(),
            })
        })
        .collect()
}

fn read_row(row: &::duckdb::Row<'_>, column_count: usize) -> Result<Vec<Value>, ::duckdb::Error> {
    (0..column_count)
        .map(|index| row.get::<_, DuckValue>(index).map(to_json_value))
        .collect()
}

fn to_json_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(value) => Value::Bool(value),
        DuckValue::TinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::SmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::Int(value) => Value::Number(Number::from(value)),
        DuckValue::BigInt(value) => Value::Number(Number::from(value)),
        DuckValue::UTinyInt(value) => Value::Number(Number::from(value)),
        DuckValue::USmallInt(value) => Value::Number(Number::from(value)),
        DuckValue::UInt(value) => Value::Number(Number::from(value)),
        DuckValue::UBigInt(value) => Value::Number(Number::from(value)),
        DuckValue::HugeInt(value) => i64::try_from(value)
            .map(|value| Value::Number(Number::from(value)))
            .unwrap_or_else(|_| Value::String(value.to_string())),
        DuckValue::Float(value) => number_from_f64(f64::from(value)),
        DuckValue::Double(value) => number_from_f64(value),
        DuckValue::Date32(days) => date_from_days(days),
        DuckValue::Text(value) => Value::String(value),
        DuckValue::Blob(value) => Value::String(hex::encode(value)),
        other => Value::String(format!("{other:?}")),
    }
}

/// NaN and infinities have no JSON representation.
fn number_from_f64(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn date_from_days(days: i32) -> Value {
    days.checked_add(UNIX_EPOCH_JULIAN_DAY)
        .and_then(|julian| time::Date::from_julian_day(julian).ok())
        .map_or_else(
            || Value::Number(Number::from(days)),
            |date| Value::String(date.to_string()),
        )
}

fn normalize_sql(sql: &str) -> Result<&str, WarehouseError> {
    let normalized = sql.trim().trim_end_matches(';').trim();
    if normalized.is_empty() {
        return Err(WarehouseError::QueryRejected(String::from(
            "query must not be empty",
        )));
    }
    Ok(normalized)
}

fn enforce_read_only_query(sql: &str) -> Result<(), WarehouseError> {
    if !is_select_like(sql) {
        return Err(WarehouseError::QueryRejected(String::from(
            "read-only mode accepts only SELECT/CTE queries; use --write for write statements",
        )));
    }
    if has_multiple_statements(sql) {
        return Err(WarehouseError::QueryRejected(String::from(
            "multiple SQL statements are not allowed in read-only mode",
        )));
    }
    Ok(())
}

fn is_select_like(sql: &str) -> bool {
    let first_keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();
    matches!(
        first_keyword.as_str(),
        "SELECT" | "WITH" | "EXPLAIN" | "SHOW" | "DESCRIBE"
    )
}

fn has_multiple_statements(sql: &str) -> bool {
    sql.split(';').filter(|part| !part.trim().is_empty()).count() > 1
}

fn ensure_timeout(started: Instant, timeout: Duration) -> Result<(), WarehouseError> {
    if started.elapsed() > timeout {
        return Err(WarehouseError::QueryTimeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        });
    }
    Ok(())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
