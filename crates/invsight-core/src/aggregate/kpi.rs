use serde::Serialize;

use crate::InventoryTable;

/// Headline figures for the KPI strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_units_sold: f64,
    /// `None` for an empty table.
    pub average_daily_sales: Option<f64>,
    pub product_count: usize,
}

pub fn kpi_summary(table: &InventoryTable) -> KpiSummary {
    let total_units_sold: f64 = table.records().iter().map(|record| record.sales).sum();
    let average_daily_sales = if table.is_empty() {
        None
    } else {
        Some(total_units_sold / table.len() as f64)
    };

    KpiSummary {
        total_units_sold,
        average_daily_sales,
        product_count: table.products().len(),
    }
}
