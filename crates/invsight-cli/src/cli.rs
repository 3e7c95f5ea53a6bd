//! CLI argument definitions for invsight.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Full single-page report |
//! | `kpi` | Headline totals |
//! | `products` | Distinct products in first-seen order |
//! | `trend` | Monthly sales for one product |
//! | `promotions` | Mean sales with and without promotion |
//! | `correlation` | Feature correlation matrix |
//! | `turnover` | Inventory turnover per product |
//! | `forecast` | Reported forecasting model metrics |
//! | `synthetic` | Synthetic demand sample |
//! | `sql` | Query an in-memory DuckDB copy of the dataset |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--stream` | `false` | Emit NDJSON lifecycle events |
//! | `--dataset` | `$INVSIGHT_DATASET` | Sales dataset (CSV or spreadsheet) |
//! | `--synthetic` | `$INVSIGHT_SYNTHETIC` | Synthetic demand sample CSV |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Inventory and sales analytics over a tabular sales export.
#[derive(Debug, Parser)]
#[command(
    name = "invsight",
    version,
    about = "Inventory and sales analytics dashboard",
    long_about = "invsight loads a sales/inventory export (CSV or spreadsheet) and reports KPIs, monthly trends, \
promotion impact, feature correlation, inventory turnover and forecast metrics.\n\
\n\
Use 'invsight <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Emit start/progress/chunk/error/end events as NDJSON.
    #[arg(long, global = true, default_value_t = false)]
    pub stream: bool,

    /// Sales dataset, CSV or spreadsheet (overrides INVSIGHT_DATASET).
    #[arg(long, global = true, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Synthetic demand sample CSV (overrides INVSIGHT_SYNTHETIC).
    #[arg(long, global = true, value_name = "PATH")]
    pub synthetic: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Metadata header followed by indented data.
    Table,
    /// Single JSON object.
    Json,
    /// One JSON object per line.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render every dashboard section.
    ///
    ///   invsight dashboard
    ///   invsight dashboard --product "Smart Kettle" --pretty
    Dashboard(DashboardArgs),

    /// Total units sold, average daily sales and product count.
    Kpi,

    /// List distinct products in the order they first appear.
    Products,

    /// Monthly sales trend for one product.
    ///
    ///   invsight trend "Smart Kettle"
    Trend(TrendArgs),

    /// Mean sales per product with and without promotion.
    Promotions,

    /// Pearson correlation between the numeric features.
    Correlation,

    /// Total sales over mean stock level per product.
    Turnover,

    /// Reported demand forecasting model metrics.
    Forecast,

    /// Synthetic demand scenarios, if a sample file is present.
    Synthetic,

    /// Run SQL against an in-memory DuckDB copy of the dataset.
    ///
    /// Rows live in `sales_records` under the dataset name `sales`; the views
    /// vw_monthly_sales, vw_promotion_impact, vw_inventory_turnover and
    /// vw_kpi_summary are prepared.
    ///
    ///   invsight sql "SELECT * FROM vw_kpi_summary"
    ///   invsight sql "SELECT * FROM vw_monthly_sales" --max-rows 50
    Sql(SqlArgs),
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Product for the trend section; defaults to the first product.
    #[arg(long)]
    pub product: Option<String>,
}

#[derive(Debug, Args)]
pub struct TrendArgs {
    pub product: String,
}

#[derive(Debug, Args)]
pub struct SqlArgs {
    pub query: String,

    /// Allow statements other than SELECT/WITH/EXPLAIN/SHOW/DESCRIBE.
    #[arg(long, default_value_t = false)]
    pub write: bool,

    #[arg(long, default_value_t = 10_000)]
    pub max_rows: usize,

    #[arg(long, default_value_t = 5_000)]
    pub query_timeout_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "invsight",
            "dashboard",
            "--product",
            "Smart Kettle",
            "--dataset",
            "sales.csv",
            "--format",
            "table",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.dataset, Some(PathBuf::from("sales.csv")));
        match cli.command {
            Command::Dashboard(args) => assert_eq!(args.product.as_deref(), Some("Smart Kettle")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn sql_guardrail_defaults() {
        let cli = Cli::try_parse_from(["invsight", "sql", "SELECT 1"]).expect("parse");
        match cli.command {
            Command::Sql(args) => {
                assert_eq!(args.max_rows, 10_000);
                assert_eq!(args.query_timeout_ms, 5_000);
                assert!(!args.write);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn trend_requires_a_product() {
        assert!(Cli::try_parse_from(["invsight", "trend"]).is_err());
    }
}
