use std::collections::BTreeMap;

use serde::Serialize;

use crate::{InventoryTable, ProductName, SelectionError, YearMonth};

/// Summed sales for one (month, product) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyProductSales {
    pub month: YearMonth,
    pub product: ProductName,
    pub total_sales: f64,
}

/// One point of a product's sales timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month: YearMonth,
    pub total_sales: f64,
}

/// Monthly sales timeline for the selected product, oldest month first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTrend {
    pub product: ProductName,
    pub points: Vec<MonthlySales>,
}

/// Group every row by (month, product) and sum Sales.
///
/// Rows come back sorted by month, then product name.
pub fn monthly_series(table: &InventoryTable) -> Vec<MonthlyProductSales> {
    let mut groups: BTreeMap<(YearMonth, &ProductName), f64> = BTreeMap::new();
    for record in table.records() {
        *groups.entry((record.month, &record.product)).or_insert(0.0) += record.sales;
    }

    groups
        .into_iter()
        .map(|((month, product), total_sales)| MonthlyProductSales {
            month,
            product: product.clone(),
            total_sales,
        })
        .collect()
}

/// Sales timeline for one product drawn from the table's distinct product set.
pub fn monthly_trend(table: &InventoryTable, product: &str) -> Result<ProductTrend, SelectionError> {
    let product = table.select_product(product)?;

    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for record in table.records().iter().filter(|record| &record.product == product) {
        *totals.entry(record.month).or_insert(0.0) += record.sales;
    }

    Ok(ProductTrend {
        product: product.clone(),
        points: totals
            .into_iter()
            .map(|(month, total_sales)| MonthlySales { month, total_sales })
            .collect(),
    })
}
