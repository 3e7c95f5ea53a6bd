use serde::Serialize;

/// Metrics reported for the externally trained demand forecasting model.
///
/// These figures are static; nothing in this crate trains or evaluates a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub model: &'static str,
    pub rmse: f64,
    pub mape_pct: f64,
    pub service_level: &'static str,
    pub scenario_note: &'static str,
}

impl ForecastSummary {
    pub const fn reported() -> Self {
        Self {
            model: "Random Forest Regressor",
            rmse: 24.63,
            mape_pct: 44.99,
            service_level: ">95%",
            scenario_note: "A Variational Autoencoder (VAE) generated synthetic demand scenarios \
                            to test model robustness.",
        }
    }

    /// Bullet lines for terminal rendering.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Model Used: {}", self.model),
            format!("RMSE: {:.2}", self.rmse),
            format!("MAPE: {:.2}%", self.mape_pct),
            format!("Service Level Achieved: {}", self.service_level),
            self.scenario_note.to_owned(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_reported_metrics() {
        let lines = ForecastSummary::reported().lines();
        assert_eq!(lines[1], "RMSE: 24.63");
        assert_eq!(lines[2], "MAPE: 44.99%");
        assert_eq!(lines[3], "Service Level Achieved: >95%");
    }
}
