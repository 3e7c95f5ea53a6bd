//! # Domain Models
//!
//! Typed schema for the sales/inventory dataset.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SalesRecord`] | One validated dataset row |
//! | [`ProductName`] | Trimmed, non-empty product identifier |
//! | [`YearMonth`] | Calendar-month grouping key |
//! | [`PromotionStatus`] | Two-valued promotion label |
//! | [`Feature`] | Numeric columns that take part in correlation |
//! | [`UtcDateTime`] | UTC timestamp used in response metadata |
//!
//! Rows are validated once, at load time. Aggregations read typed fields
//! and never look columns up by name.

mod month;
mod product;
mod record;
mod timestamp;

pub use month::{parse_record_date, YearMonth};
pub use product::ProductName;
pub use record::{Feature, PromotionStatus, SalesRecord};
pub use timestamp::UtcDateTime;
