//! Input file locations.
//!
//! Resolution order for each setting: explicit override (CLI flag), then
//! environment variable, then the built-in default.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `INVSIGHT_DATASET` | `AI_Inventory_Management_Dataset_2000.xlsx` |
//! | `INVSIGHT_SYNTHETIC` | `vae_synthetic_samples.csv` |

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_DATASET_FILE: &str = "AI_Inventory_Management_Dataset_2000.xlsx";
pub const DEFAULT_SYNTHETIC_FILE: &str = "vae_synthetic_samples.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Primary sales/inventory dataset.
    pub dataset_path: PathBuf,
    /// Optional synthetic demand sample.
    pub synthetic_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::from_lookup(|name| env::var_os(name))
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Resolve settings through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        Self {
            dataset_path: non_empty("INVSIGHT_DATASET")
                .map_or_else(|| PathBuf::from(DEFAULT_DATASET_FILE), PathBuf::from),
            synthetic_path: non_empty("INVSIGHT_SYNTHETIC")
                .map_or_else(|| PathBuf::from(DEFAULT_SYNTHETIC_FILE), PathBuf::from),
        }
    }

    pub fn with_dataset(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.dataset_path = path;
        }
        self
    }

    pub fn with_synthetic(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.synthetic_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), OsString::from(value)))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_relative_filenames() {
        let config = DashboardConfig::from_lookup(lookup(&[("HOME", "/home/ana")]));
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_FILE));
        assert_eq!(config.synthetic_path, PathBuf::from(DEFAULT_SYNTHETIC_FILE));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("INVSIGHT_DATASET", "/data/sales.csv"),
            ("INVSIGHT_SYNTHETIC", ""),
        ]));
        assert_eq!(config.dataset_path, PathBuf::from("/data/sales.csv"));
        assert_eq!(config.synthetic_path, PathBuf::from(DEFAULT_SYNTHETIC_FILE));
    }

    #[test]
    fn explicit_override_wins() {
        let config = DashboardConfig::from_lookup(lookup(&[("INVSIGHT_DATASET", "/data/a.csv")]))
            .with_dataset(Some(PathBuf::from("b.csv")))
            .with_synthetic(None);
        assert_eq!(config.dataset_path, PathBuf::from("b.csv"));
        assert_eq!(config.synthetic_path, PathBuf::from(DEFAULT_SYNTHETIC_FILE));
    }
}
