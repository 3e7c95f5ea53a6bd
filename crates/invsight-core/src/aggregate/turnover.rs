use std::collections::BTreeMap;

use serde::Serialize;

use crate::{InventoryTable, ProductName};

/// Turnover outcome for one product.
///
/// A product whose mean stock level is zero has no defined ratio and is
/// reported as `Unavailable` rather than as an infinite or NaN value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnoverRatio {
    Available { ratio: f64 },
    Unavailable { reason: String },
}

impl TurnoverRatio {
    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Available { ratio } => Some(*ratio),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTurnover {
    pub product: ProductName,
    pub total_sales: f64,
    pub mean_stock_level: f64,
    pub turnover: TurnoverRatio,
}

/// Total units sold divided by mean stock level, per product, sorted by name.
pub fn inventory_turnover(table: &InventoryTable) -> Vec<ProductTurnover> {
    let mut groups: BTreeMap<&ProductName, (f64, f64, usize)> = BTreeMap::new();
    for record in table.records() {
        let (sales, stock, count) = groups.entry(&record.product).or_insert((0.0, 0.0, 0));
        *sales += record.sales;
        *stock += record.stock_level;
        *count += 1;
    }

    groups
        .into_iter()
        .map(|(product, (total_sales, stock_sum, count))| {
            let mean_stock_level = stock_sum / count as f64;
            ProductTurnover {
                product: product.clone(),
                total_sales,
                mean_stock_level,
                turnover: turnover_ratio(total_sales, mean_stock_level),
            }
        })
        .collect()
}

fn turnover_ratio(total_sales: f64, mean_stock_level: f64) -> TurnoverRatio {
    if mean_stock_level == 0.0 {
        return TurnoverRatio::Unavailable {
            reason: String::from("mean stock level is zero"),
        };
    }

    let ratio = total_sales / mean_stock_level;
    if ratio.is_finite() {
        TurnoverRatio::Available { ratio }
    } else {
        TurnoverRatio::Unavailable {
            reason: String::from("ratio is not a finite number"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::{row, table};

    #[test]
    fn divides_total_sales_by_mean_stock() {
        let table = table(vec![
            row((2024, 1, 1), "Kettle", 40.0, 20.0, 0),
            row((2024, 1, 2), "Kettle", 60.0, 30.0, 1),
        ]);

        let turnover = inventory_turnover(&table);
        assert_eq!(turnover.len(), 1);
        assert_eq!(turnover[0].total_sales, 100.0);
        assert_eq!(turnover[0].mean_stock_level, 25.0);
        assert_eq!(turnover[0].turnover, TurnoverRatio::Available { ratio: 4.0 });
    }

    #[test]
    fn zero_stock_is_reported_unavailable() {
        let table = table(vec![
            row((2024, 1, 1), "Blender", 9.0, 0.0, 0),
            row((2024, 1, 2), "Blender", 3.0, 0.0, 0),
            row((2024, 1, 2), "Kettle", 3.0, 3.0, 0),
        ]);

        let turnover = inventory_turnover(&table);
        assert_eq!(turnover[0].product.as_str(), "Blender");
        assert!(matches!(turnover[0].turnover, TurnoverRatio::Unavailable { .. }));
        assert_eq!(turnover[0].turnover.ratio(), None);
        assert_eq!(turnover[1].turnover.ratio(), Some(1.0));
    }

    #[test]
    fn unavailable_serializes_with_reason() {
        let json = serde_json::to_value(turnover_ratio(5.0, 0.0)).expect("serializes");
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "mean stock level is zero");
    }
}
