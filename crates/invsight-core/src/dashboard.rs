//! Single-page dashboard assembly.
//!
//! Runs every aggregation pass over one shared table and arranges the
//! results in page order. Sections that cannot be computed become
//! placeholders with a reason instead of failing the whole render.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    correlation_matrix, inventory_turnover, kpi_summary, load_synthetic_series, monthly_trend,
    promotion_impact, CorrelationMatrix, ForecastSummary, InventoryTable, KpiSummary, ProductName,
    ProductTrend, ProductTurnover, PromotionImpact, SelectionError, SyntheticOutcome,
    SyntheticSeries,
};

pub const KPI_CAPTION: &str = "Headline totals across every product and day";
pub const TREND_CAPTION: &str = "Monthly sales trend for the selected product";
pub const PROMOTION_CAPTION: &str = "Average sales per product with and without promotion";
pub const CORRELATION_CAPTION: &str = "Pearson correlation between numeric features";
pub const FORECAST_CAPTION: &str = "Reported demand forecasting model performance";
pub const TURNOVER_CAPTION: &str = "Inventory turnover: total sales over mean stock level";
pub const SYNTHETIC_CAPTION: &str = "Synthetic demand scenarios from a generative model";

/// Either computed data or the reason it could not be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready { data: T },
    Placeholder { reason: String },
}

impl<T> Panel<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready { data } => Some(data),
            Self::Placeholder { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub caption: &'static str,
    #[serde(flatten)]
    pub panel: Panel<T>,
}

impl<T> Section<T> {
    fn ready(caption: &'static str, data: T) -> Self {
        Self {
            caption,
            panel: Panel::Ready { data },
        }
    }

    fn placeholder(caption: &'static str, reason: impl Into<String>) -> Self {
        Self {
            caption,
            panel: Panel::Placeholder {
                reason: reason.into(),
            },
        }
    }
}

/// Everything the dashboard page shows, in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub products: Vec<ProductName>,
    pub selected_product: Option<ProductName>,
    pub kpis: Section<KpiSummary>,
    pub trend: Section<ProductTrend>,
    pub promotion: Section<Vec<PromotionImpact>>,
    pub correlation: Section<CorrelationMatrix>,
    pub forecast: Section<ForecastSummary>,
    pub turnover: Section<Vec<ProductTurnover>>,
    pub synthetic: Section<SyntheticSeries>,
    pub warnings: Vec<String>,
}

pub struct Dashboard;

impl Dashboard {
    /// Render the full page for `selection`, or for the first product when
    /// no selection is given.
    ///
    /// An unknown selection is rejected before any aggregation runs.
    pub fn render(
        table: &InventoryTable,
        selection: Option<&str>,
        synthetic_path: &Path,
    ) -> Result<DashboardReport, SelectionError> {
        let selected = match selection {
            Some(name) => Some(table.select_product(name)?.clone()),
            None => table.products().first().cloned(),
        };

        let ((kpis, trend), ((promotion, correlation), (turnover, synthetic))) = rayon::join(
            || {
                rayon::join(
                    || kpi_summary(table),
                    || {
                        selected
                            .as_ref()
                            .map(|product| monthly_trend(table, product.as_str()))
                    },
                )
            },
            || {
                rayon::join(
                    || rayon::join(|| promotion_impact(table), || correlation_matrix(table)),
                    || {
                        rayon::join(
                            || inventory_turnover(table),
                            || load_synthetic_series(synthetic_path),
                        )
                    },
                )
            },
        );

        let mut warnings = Vec::new();

        let trend = match trend.transpose()? {
            Some(trend) => Section::ready(TREND_CAPTION, trend),
            None => Section::placeholder(TREND_CAPTION, "dataset has no products"),
        };

        let correlation = match correlation {
            Ok(matrix) => Section::ready(CORRELATION_CAPTION, matrix),
            Err(error) => {
                warn!(rows = error.rows, "correlation heatmap skipped");
                warnings.push(format!("correlation unavailable: {error}"));
                Section::placeholder(CORRELATION_CAPTION, error.to_string())
            }
        };

        let synthetic = match synthetic {
            SyntheticOutcome::Available { series } => Section::ready(SYNTHETIC_CAPTION, series),
            SyntheticOutcome::Unavailable { notice, reason } => {
                warnings.push(format!("synthetic demand sample unavailable: {reason}"));
                Section::placeholder(SYNTHETIC_CAPTION, notice)
            }
        };

        debug!(
            rows = table.len(),
            selected = selected.as_ref().map_or("", ProductName::as_str),
            warnings = warnings.len(),
            "dashboard assembled"
        );

        Ok(DashboardReport {
            products: table.products().to_vec(),
            selected_product: selected,
            kpis: Section::ready(KPI_CAPTION, kpis),
            trend,
            promotion: Section::ready(PROMOTION_CAPTION, promotion),
            correlation,
            forecast: Section::ready(FORECAST_CAPTION, ForecastSummary::reported()),
            turnover: Section::ready(TURNOVER_CAPTION, turnover),
            synthetic,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::{row, table};
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> InventoryTable {
        table(vec![
            row((2024, 2, 3), "Kettle", 10.0, 40.0, 0),
            row((2024, 1, 9), "Blender", 4.0, 12.0, 1),
            row((2024, 1, 5), "Kettle", 20.0, 35.0, 1),
            row((2024, 3, 1), "Blender", 6.0, 10.0, 0),
        ])
    }

    #[test]
    fn defaults_to_first_product() {
        let temp = tempdir().expect("tempdir");
        let report = Dashboard::render(&sample(), None, &temp.path().join("missing.csv"))
            .expect("render");

        assert_eq!(report.selected_product.as_ref().map(ProductName::as_str), Some("Kettle"));
        let trend = report.trend.panel.data().expect("trend ready");
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].month.to_string(), "2024-01");
    }

    #[test]
    fn unknown_selection_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let err = Dashboard::render(&sample(), Some("Fridge"), temp.path())
            .expect_err("must fail");
        assert_eq!(err.available, ["Kettle", "Blender"]);
    }

    #[test]
    fn missing_synthetic_file_becomes_notice_and_warning() {
        let temp = tempdir().expect("tempdir");
        let report = Dashboard::render(&sample(), Some("Blender"), &temp.path().join("vae.csv"))
            .expect("render");

        assert!(matches!(
            report.synthetic.panel,
            Panel::Placeholder { ref reason } if reason == crate::SYNTHETIC_UNAVAILABLE_NOTICE
        ));
        assert_eq!(report.warnings.len(), 1);
        assert!(report.kpis.panel.is_ready());
        assert!(report.correlation.panel.is_ready());
    }

    #[test]
    fn single_row_table_gets_correlation_placeholder() {
        let temp = tempdir().expect("tempdir");
        let samples = temp.path().join("vae.csv");
        fs::write(&samples, "scenario\n1\n2\n").expect("write");

        let single = table(vec![row((2024, 1, 1), "Kettle", 3.0, 9.0, 0)]);
        let report = Dashboard::render(&single, None, &samples).expect("render");

        assert!(!report.correlation.panel.is_ready());
        assert!(report.synthetic.panel.is_ready());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("correlation unavailable"));
    }

    #[test]
    fn empty_table_still_renders() {
        let temp = tempdir().expect("tempdir");
        let report = Dashboard::render(&InventoryTable::default(), None, temp.path())
            .expect("render");

        assert!(report.products.is_empty());
        assert!(report.selected_product.is_none());
        assert!(!report.trend.panel.is_ready());
        assert_eq!(
            report.kpis.panel.data().map(|kpis| kpis.average_daily_sales),
            Some(None)
        );
    }

    #[test]
    fn repeated_renders_are_identical() {
        let temp = tempdir().expect("tempdir");
        let samples = temp.path().join("vae.csv");
        let data = sample();

        let first = Dashboard::render(&data, None, &samples).expect("first");
        let second = Dashboard::render(&data, None, &samples).expect("second");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }

    #[test]
    fn sections_serialize_with_status_and_caption() {
        let temp = tempdir().expect("tempdir");
        let report = Dashboard::render(&sample(), None, temp.path()).expect("render");
        let value = serde_json::to_value(&report).expect("serialize");

        assert_eq!(value["forecast"]["status"], "ready");
        assert_eq!(value["forecast"]["caption"], FORECAST_CAPTION);
        assert_eq!(value["synthetic"]["status"], "placeholder");
        assert_eq!(value["selected_product"], "Kettle");
    }
}
