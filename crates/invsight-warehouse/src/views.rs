//! Analytical views over `sales_records`.

use ::duckdb::Connection;

/// View names created by [`create_views`].
pub const VIEW_NAMES: [&str; 4] = [
    "vw_monthly_sales",
    "vw_promotion_impact",
    "vw_inventory_turnover",
    "vw_kpi_summary",
];

/// Create or refresh the analytical views.
///
/// Views carry no ORDER BY; callers order their own selects.
///
/// - `vw_monthly_sales`: total sales per dataset, month and product
/// - `vw_promotion_impact`: mean sales per product and promotion label
/// - `vw_inventory_turnover`: total sales over mean stock, NULL when mean stock is zero
/// - `vw_kpi_summary`: headline totals per dataset
pub fn create_views(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r"
CREATE OR REPLACE VIEW vw_monthly_sales AS
SELECT
    dataset,
    strftime(date, '%Y-%m') AS month,
    product,
    SUM(sales)::DOUBLE AS total_sales
FROM sales_records
GROUP BY dataset, strftime(date, '%Y-%m'), product;

CREATE OR REPLACE VIEW vw_promotion_impact AS
SELECT
    dataset,
    product,
    CASE WHEN promotion THEN 'Promo' ELSE 'No Promo' END AS promotion,
    AVG(sales)::DOUBLE AS mean_sales,
    COUNT(*) AS observations
FROM sales_records
GROUP BY dataset, product, sales_records.promotion;

CREATE OR REPLACE VIEW vw_inventory_turnover AS
SELECT
    dataset,
    product,
    SUM(sales)::DOUBLE AS total_sales,
    AVG(stock_level)::DOUBLE AS mean_stock_level,
    CASE
        WHEN AVG(stock_level) = 0 THEN NULL
        ELSE SUM(sales) / AVG(stock_level)
    END::DOUBLE AS turnover_ratio
FROM sales_records
GROUP BY dataset, product;

CREATE OR REPLACE VIEW vw_kpi_summary AS
SELECT
    dataset,
    SUM(sales)::DOUBLE AS total_units_sold,
    AVG(sales)::DOUBLE AS average_daily_sales,
    COUNT(DISTINCT product) AS product_count,
    COUNT(*) AS row_count
FROM sales_records
GROUP BY dataset;
",
    )?;

    Ok(())
}
