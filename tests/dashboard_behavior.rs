//! Behavior-driven tests for the dashboard pipeline
//!
//! These tests verify WHAT an analyst sees on the dashboard for a given
//! dataset export, independent of how each section is computed.

use invsight_core::{
    correlation_matrix, inventory_turnover, kpi_summary, load_dataset, monthly_trend,
    promotion_impact, Dashboard, Feature, Panel, PromotionStatus, TurnoverRatio,
    SYNTHETIC_UNAVAILABLE_NOTICE,
};
use invsight_tests::{write_csv, write_sample_dataset, write_synthetic, SAMPLE_ROWS};
use tempfile::tempdir;

// =============================================================================
// Dashboard: Full Page
// =============================================================================

#[test]
fn analyst_opening_the_dashboard_sees_every_section_for_the_first_product() {
    // Given: The sales export and a synthetic sample next to it
    let temp = tempdir().expect("tempdir");
    let dataset = write_sample_dataset(temp.path());
    let synthetic = write_synthetic(temp.path(), "scenario_1,scenario_2\n10,12\n11,13\n9,15\n");
    let table = load_dataset(&dataset).expect("dataset loads");

    // When: The dashboard renders without an explicit selection
    let report = Dashboard::render(&table, None, &synthetic).expect("dashboard renders");

    // Then: The product selector lists products in the order they first appear
    let products: Vec<_> = report.products.iter().map(|p| p.as_str()).collect();
    assert_eq!(products, ["Smart Kettle", "Desk Lamp", "Yoga Mat"]);

    // And: The trend defaults to the first product, oldest month first
    let trend = report.trend.panel.data().expect("trend ready");
    assert_eq!(trend.product.as_str(), "Smart Kettle");
    let months: Vec<_> = trend.points.iter().map(|p| p.month.to_string()).collect();
    assert_eq!(months, ["2024-01", "2024-02", "2024-03"]);
    let totals: Vec<_> = trend.points.iter().map(|p| p.total_sales).collect();
    assert_eq!(totals, [30.0, 9.0, 22.0]);

    // And: Every section is ready and nothing needs a warning
    assert!(report.kpis.panel.is_ready());
    assert!(report.promotion.panel.is_ready());
    assert!(report.correlation.panel.is_ready());
    assert!(report.forecast.panel.is_ready());
    assert!(report.turnover.panel.is_ready());
    let series = report.synthetic.panel.data().expect("synthetic ready");
    assert_eq!(series.row_count, 3);
    assert_eq!(series.columns.len(), 2);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn analyst_can_switch_the_trend_to_another_product() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");

    let report = Dashboard::render(&table, Some("Desk Lamp"), &temp.path().join("none.csv"))
        .expect("dashboard renders");

    let trend = report.trend.panel.data().expect("trend ready");
    assert_eq!(trend.product.as_str(), "Desk Lamp");
    assert_eq!(trend.points.len(), 1);
    assert_eq!(trend.points[0].total_sales, 20.0);
}

#[test]
fn selecting_an_unknown_product_lists_the_valid_choices() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");

    let error = Dashboard::render(&table, Some("Air Fryer"), temp.path())
        .expect_err("unknown product must be rejected");

    assert_eq!(error.requested, "Air Fryer");
    assert_eq!(error.available, ["Smart Kettle", "Desk Lamp", "Yoga Mat"]);
}

// =============================================================================
// Dashboard: Optional Synthetic Sample
// =============================================================================

#[test]
fn missing_synthetic_sample_only_affects_its_own_section() {
    // Given: The same dataset rendered with and without a synthetic sample
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");
    let present = write_synthetic(temp.path(), "demand\n4\n5\n");
    let absent = temp.path().join("missing").join("vae_synthetic_samples.csv");

    // When: Both dashboards render
    let with_sample = Dashboard::render(&table, None, &present).expect("render");
    let without_sample = Dashboard::render(&table, None, &absent).expect("render");

    // Then: The synthetic section shows the guidance notice
    match &without_sample.synthetic.panel {
        Panel::Placeholder { reason } => assert_eq!(reason, SYNTHETIC_UNAVAILABLE_NOTICE),
        other => panic!("expected placeholder, got {other:?}"),
    }
    assert_eq!(without_sample.warnings.len(), 1);

    // And: Every other section is unchanged
    assert_eq!(with_sample.kpis, without_sample.kpis);
    assert_eq!(with_sample.trend, without_sample.trend);
    assert_eq!(with_sample.promotion, without_sample.promotion);
    assert_eq!(with_sample.correlation, without_sample.correlation);
    assert_eq!(with_sample.turnover, without_sample.turnover);
}

#[test]
fn header_only_synthetic_sample_is_treated_as_unavailable() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");
    let header_only = write_synthetic(temp.path(), "demand\n");

    let report = Dashboard::render(&table, None, &header_only).expect("render");
    assert!(!report.synthetic.panel.is_ready());
}

// =============================================================================
// Aggregations: Observable Figures
// =============================================================================

#[test]
fn kpis_report_totals_average_and_distinct_products() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");

    let kpis = kpi_summary(&table);
    assert_eq!(kpis.total_units_sold, 136.0);
    assert_eq!(kpis.average_daily_sales, Some(17.0));
    assert_eq!(kpis.product_count, 3);
}

#[test]
fn promotion_impact_splits_each_product_by_label() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");

    let rows = promotion_impact(&table);
    let kettle: Vec<_> = rows
        .iter()
        .filter(|row| row.product.as_str() == "Smart Kettle")
        .map(|row| (row.status, row.mean_sales, row.observations))
        .collect();

    assert_eq!(
        kettle,
        [
            (PromotionStatus::NoPromo, 10.5, 2),
            (PromotionStatus::Promo, 20.0, 2)
        ]
    );
    assert_eq!(rows.len(), 6);
}

#[test]
fn zero_stock_products_report_unavailable_turnover() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");

    let turnover = inventory_turnover(&table);
    let lamp = turnover
        .iter()
        .find(|row| row.product.as_str() == "Desk Lamp")
        .expect("lamp row");
    assert_eq!(lamp.turnover.ratio(), Some(0.4));

    let mat = turnover
        .iter()
        .find(|row| row.product.as_str() == "Yoga Mat")
        .expect("mat row");
    assert!(matches!(mat.turnover, TurnoverRatio::Unavailable { .. }));
    assert_eq!(mat.total_sales, 55.0);
}

#[test]
fn correlation_matrix_is_symmetric_with_unit_diagonal() {
    let temp = tempdir().expect("tempdir");
    let table = load_dataset(&write_sample_dataset(temp.path())).expect("dataset loads");

    let matrix = correlation_matrix(&table).expect("enough rows");
    for row in Feature::ALL {
        assert_eq!(matrix.get(row, row), Some(1.0));
        for column in Feature::ALL {
            assert_eq!(matrix.get(row, column), matrix.get(column, row));
        }
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn row_order_in_the_export_does_not_change_the_figures() {
    let temp = tempdir().expect("tempdir");
    let forward = load_dataset(&write_csv(temp.path(), "forward.csv", SAMPLE_ROWS))
        .expect("forward loads");
    let reversed_rows: Vec<&str> = SAMPLE_ROWS.iter().rev().copied().collect();
    let reversed = load_dataset(&write_csv(temp.path(), "reversed.csv", &reversed_rows))
        .expect("reversed loads");

    assert_eq!(
        monthly_trend(&forward, "Smart Kettle").expect("trend"),
        monthly_trend(&reversed, "Smart Kettle").expect("trend")
    );
    assert_eq!(promotion_impact(&forward), promotion_impact(&reversed));
    assert_eq!(inventory_turnover(&forward), inventory_turnover(&reversed));
    assert_eq!(kpi_summary(&forward), kpi_summary(&reversed));
}

#[test]
fn rendering_the_same_file_twice_is_bit_identical() {
    let temp = tempdir().expect("tempdir");
    let dataset = write_sample_dataset(temp.path());
    let synthetic = write_synthetic(temp.path(), "a,b\n1.5,2.5\n3.5,4.5\n");

    let first = Dashboard::render(&load_dataset(&dataset).expect("load"), None, &synthetic)
        .expect("first render");
    let second = Dashboard::render(&load_dataset(&dataset).expect("load"), None, &synthetic)
        .expect("second render");

    assert_eq!(
        serde_json::to_vec(&first).expect("serialize"),
        serde_json::to_vec(&second).expect("serialize")
    );
}
