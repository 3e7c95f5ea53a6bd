//! Single-section commands over the loaded dataset.

use invsight_core::{
    correlation_matrix, inventory_turnover, kpi_summary, monthly_trend, promotion_impact, Panel,
    SourceId, TurnoverRatio,
};
use serde::Serialize;

use crate::cli::TrendArgs;
use crate::error::CliError;

use super::{placeholder_error, CommandResult, Context};

#[derive(Debug, Serialize)]
struct RowsResponse<T> {
    rows: Vec<T>,
    row_count: usize,
}

impl<T> From<Vec<T>> for RowsResponse<T> {
    fn from(rows: Vec<T>) -> Self {
        Self {
            row_count: rows.len(),
            rows,
        }
    }
}

pub fn kpi(context: &Context) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let data = serde_json::to_value(kpi_summary(&dataset.table))?;
    Ok(CommandResult::ok(data, vec![SourceId::Dataset]).with_cache_hit(dataset.cache_hit))
}

pub fn trend(context: &Context, args: &TrendArgs) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let trend = monthly_trend(&dataset.table, &args.product)?;
    let data = serde_json::to_value(trend)?;
    Ok(CommandResult::ok(data, vec![SourceId::Dataset]).with_cache_hit(dataset.cache_hit))
}

pub fn promotions(context: &Context) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let data = serde_json::to_value(RowsResponse::from(promotion_impact(&dataset.table)))?;
    Ok(CommandResult::ok(data, vec![SourceId::Dataset]).with_cache_hit(dataset.cache_hit))
}

/// Too few rows yields a placeholder and a warning rather than an error.
pub fn correlation(context: &Context) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let (panel, warning) = match correlation_matrix(&dataset.table) {
        Ok(matrix) => (Panel::Ready { data: matrix }, None),
        Err(error) => (
            Panel::Placeholder {
                reason: error.to_string(),
            },
            Some(format!("correlation unavailable: {error}")),
        ),
    };

    let errors = placeholder_error(&panel, "insufficient_data", SourceId::Dataset)?;
    let mut result = CommandResult::ok(serde_json::to_value(panel)?, vec![SourceId::Dataset])
        .with_cache_hit(dataset.cache_hit)
        .with_errors(errors.into_iter().collect());
    if let Some(warning) = warning {
        result = result.with_warning(warning);
    }
    Ok(result)
}

pub fn turnover(context: &Context) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let rows = inventory_turnover(&dataset.table);
    let unavailable: Vec<String> = rows
        .iter()
        .filter_map(|row| match &row.turnover {
            TurnoverRatio::Available { .. } => None,
            TurnoverRatio::Unavailable { reason } => {
                Some(format!("turnover unavailable for '{}': {reason}", row.product))
            }
        })
        .collect();

    let data = serde_json::to_value(RowsResponse::from(rows))?;
    Ok(CommandResult::ok(data, vec![SourceId::Dataset])
        .with_cache_hit(dataset.cache_hit)
        .with_warnings(unavailable))
}
