use std::collections::BTreeMap;

use serde::Serialize;

use crate::{InventoryTable, ProductName, PromotionStatus};

/// Mean Sales of one product under one promotion status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionImpact {
    pub product: ProductName,
    pub status: PromotionStatus,
    pub mean_sales: f64,
    pub observations: usize,
}

/// Mean Sales grouped by (product, promotion status).
///
/// Sorted by product name, `No Promo` before `Promo`. A status a product
/// never had produces no row.
pub fn promotion_impact(table: &InventoryTable) -> Vec<PromotionImpact> {
    let mut groups: BTreeMap<(&ProductName, PromotionStatus), (f64, usize)> = BTreeMap::new();
    for record in table.records() {
        let (sum, count) = groups
            .entry((&record.product, record.promotion))
            .or_insert((0.0, 0));
        *sum += record.sales;
        *count += 1;
    }

    groups
        .into_iter()
        .map(|((product, status), (sum, count))| PromotionImpact {
            product: product.clone(),
            status,
            mean_sales: sum / count as f64,
            observations: count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::{row, table};

    #[test]
    fn averages_each_promotion_state() {
        let table = table(vec![
            row((2024, 1, 1), "Kettle", 10.0, 20.0, 0),
            row((2024, 1, 2), "Kettle", 20.0, 20.0, 1),
            row((2024, 1, 3), "Kettle", 30.0, 20.0, 0),
        ]);

        let impact = promotion_impact(&table);
        assert_eq!(impact.len(), 2);
        assert_eq!(impact[0].status, PromotionStatus::NoPromo);
        assert_eq!(impact[0].mean_sales, 20.0);
        assert_eq!(impact[0].observations, 2);
        assert_eq!(impact[1].status, PromotionStatus::Promo);
        assert_eq!(impact[1].mean_sales, 20.0);
    }

    #[test]
    fn product_without_promotions_has_single_row() {
        let table = table(vec![
            row((2024, 1, 1), "Blender", 4.0, 20.0, 0),
            row((2024, 1, 1), "Kettle", 6.0, 20.0, 1),
        ]);

        let impact = promotion_impact(&table);
        let labels: Vec<(&str, &str)> = impact
            .iter()
            .map(|row| (row.product.as_str(), row.status.label()))
            .collect();
        assert_eq!(labels, [("Blender", "No Promo"), ("Kettle", "Promo")]);
    }
}
