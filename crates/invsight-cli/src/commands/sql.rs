use invsight_core::{PromotionStatus, SalesRecord, SourceId};
use invsight_warehouse::{QueryGuardrails, SalesRow, Warehouse, WarehouseConfig};

use crate::cli::SqlArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

/// Name the loaded rows are stored under in `sales_records.dataset`.
const WAREHOUSE_DATASET: &str = "sales";

pub fn run(context: &Context, args: &SqlArgs) -> Result<CommandResult, CliError> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::Command(String::from("query must not be empty")));
    }

    let dataset = context.dataset()?;
    let warehouse = Warehouse::open(WarehouseConfig::default())?;
    let rows: Vec<SalesRow> = dataset.table.records().iter().map(to_sales_row).collect();
    warehouse.ingest_records(WAREHOUSE_DATASET, &context.request_id, &rows)?;

    let guardrails = QueryGuardrails {
        max_rows: args.max_rows,
        query_timeout_ms: args.query_timeout_ms,
    };
    let result = warehouse.execute_query(query, guardrails, args.write)?;

    let truncated = result.truncated;
    let row_count = result.row_count;
    let mut command_result = CommandResult::ok(
        serde_json::to_value(result)?,
        vec![SourceId::Dataset, SourceId::Warehouse],
    )
    .with_cache_hit(dataset.cache_hit);

    if rows.is_empty() {
        command_result = command_result.with_warning("dataset has no rows; sales_records is empty");
    }
    if truncated {
        command_result = command_result.with_warning(format!(
            "result truncated at {row_count} rows (use --max-rows to increase limit)"
        ));
    }

    Ok(command_result)
}

fn to_sales_row(record: &SalesRecord) -> SalesRow {
    SalesRow {
        date: record.date.to_string(),
        product: record.product.to_string(),
        sales: record.sales,
        stock_level: record.stock_level,
        supplier_lead_time: record.supplier_lead_time,
        price_per_unit: record.price_per_unit,
        weather_index: record.weather_index,
        promotion: record.promotion == PromotionStatus::Promo,
    }
}
