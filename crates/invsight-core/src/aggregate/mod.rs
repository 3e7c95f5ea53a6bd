//! Stateless reductions over an [`InventoryTable`](crate::InventoryTable).
//!
//! Every pass takes the table by shared reference and returns plain,
//! serializable output. Grouped outputs use ordered maps internally so the
//! same table always produces the same sequence of rows.

mod correlation;
mod kpi;
mod promotion;
mod trend;
mod turnover;

pub use correlation::{correlation_matrix, CorrelationMatrix, MIN_CORRELATION_ROWS};
pub use kpi::{kpi_summary, KpiSummary};
pub use promotion::{promotion_impact, PromotionImpact};
pub use trend::{monthly_series, monthly_trend, MonthlyProductSales, MonthlySales, ProductTrend};
pub use turnover::{inventory_turnover, ProductTurnover, TurnoverRatio};
