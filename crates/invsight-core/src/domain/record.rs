use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{ProductName, ValidationError, YearMonth};

/// Label derived from the dataset's 0/1 Promotion flag.
///
/// Ordered so that `NoPromo` sorts before `Promo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PromotionStatus {
    #[serde(rename = "No Promo")]
    NoPromo,
    #[serde(rename = "Promo")]
    Promo,
}

impl PromotionStatus {
    /// Map a raw flag cell. Spreadsheet exports sometimes write `1.0` or `TRUE`.
    pub fn from_flag(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "0.0" | "false" => Ok(Self::NoPromo),
            "1" | "1.0" | "true" => Ok(Self::Promo),
            _ => Err(ValidationError::InvalidPromotionFlag {
                value: value.to_owned(),
            }),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NoPromo => "No Promo",
            Self::Promo => "Promo",
        }
    }
}

impl Display for PromotionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric dataset columns that take part in the correlation matrix, in matrix order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "Sales")]
    Sales,
    #[serde(rename = "Stock_Level")]
    StockLevel,
    #[serde(rename = "Supplier_Lead_Time")]
    SupplierLeadTime,
    #[serde(rename = "Price_Per_Unit")]
    PricePerUnit,
    #[serde(rename = "Weather_Index")]
    WeatherIndex,
}

impl Feature {
    pub const ALL: [Self; 5] = [
        Self::Sales,
        Self::StockLevel,
        Self::SupplierLeadTime,
        Self::PricePerUnit,
        Self::WeatherIndex,
    ];

    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::StockLevel => "Stock_Level",
            Self::SupplierLeadTime => "Supplier_Lead_Time",
            Self::PricePerUnit => "Price_Per_Unit",
            Self::WeatherIndex => "Weather_Index",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Sales => 0,
            Self::StockLevel => 1,
            Self::SupplierLeadTime => 2,
            Self::PricePerUnit => 3,
            Self::WeatherIndex => 4,
        }
    }

    pub fn value(self, record: &SalesRecord) -> f64 {
        match self {
            Self::Sales => record.sales,
            Self::StockLevel => record.stock_level,
            Self::SupplierLeadTime => record.supplier_lead_time,
            Self::PricePerUnit => record.price_per_unit,
            Self::WeatherIndex => record.weather_index,
        }
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One validated row of the sales/inventory dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub date: Date,
    pub month: YearMonth,
    pub product: ProductName,
    pub sales: f64,
    pub stock_level: f64,
    pub supplier_lead_time: f64,
    pub price_per_unit: f64,
    pub weather_index: f64,
    pub promotion: PromotionStatus,
}

impl SalesRecord {
    /// Build a record, deriving the month key and enforcing numeric invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: Date,
        product: ProductName,
        sales: f64,
        stock_level: f64,
        supplier_lead_time: f64,
        price_per_unit: f64,
        weather_index: f64,
        promotion: PromotionStatus,
    ) -> Result<Self, ValidationError> {
        validate_finite("Sales", sales)?;
        if sales < 0.0 {
            return Err(ValidationError::NegativeValue { field: "Sales" });
        }
        validate_finite("Stock_Level", stock_level)?;
        validate_finite("Supplier_Lead_Time", supplier_lead_time)?;
        validate_finite("Price_Per_Unit", price_per_unit)?;
        validate_finite("Weather_Index", weather_index)?;

        Ok(Self {
            date,
            month: YearMonth::from_date(date),
            product,
            sales,
            stock_level,
            supplier_lead_time,
            price_per_unit,
            weather_index,
            promotion,
        })
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date() -> Date {
        Date::from_calendar_date(2024, Month::May, 9).expect("valid date")
    }

    #[test]
    fn derives_month_key() {
        let record = SalesRecord::new(
            date(),
            ProductName::parse("Widget").expect("name"),
            12.0,
            40.0,
            3.0,
            9.99,
            0.4,
            PromotionStatus::NoPromo,
        )
        .expect("valid record");
        assert_eq!(record.month.to_string(), "2024-05");
    }

    #[test]
    fn rejects_negative_sales() {
        let err = SalesRecord::new(
            date(),
            ProductName::parse("Widget").expect("name"),
            -1.0,
            40.0,
            3.0,
            9.99,
            0.4,
            PromotionStatus::Promo,
        )
        .expect_err("must fail");
        assert_eq!(err, ValidationError::NegativeValue { field: "Sales" });
    }

    #[test]
    fn promotion_flag_accepts_spreadsheet_variants() {
        assert_eq!(PromotionStatus::from_flag("1.0"), Ok(PromotionStatus::Promo));
        assert_eq!(PromotionStatus::from_flag(" FALSE "), Ok(PromotionStatus::NoPromo));
        assert!(PromotionStatus::from_flag("2").is_err());
    }

    #[test]
    fn promotion_labels_serialize_for_charts() {
        let json = serde_json::to_string(&[PromotionStatus::NoPromo, PromotionStatus::Promo])
            .expect("serializes");
        assert_eq!(json, r#"["No Promo","Promo"]"#);
    }

    #[test]
    fn feature_indices_follow_matrix_order() {
        for (position, feature) in Feature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), position);
        }
    }
}
