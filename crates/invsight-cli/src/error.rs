use invsight_core::{LoadError, SelectionError, ValidationError};
use invsight_warehouse::WarehouseError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Selection(_) | Self::Command(_) => 2,
            Self::Load(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Warehouse(_) => 6,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn categories_map_to_exit_codes() {
        let selection = CliError::from(SelectionError {
            requested: String::from("Fridge"),
            available: vec![String::from("Kettle")],
        });
        assert_eq!(selection.exit_code(), 2);

        let load = CliError::from(LoadError::NotFound {
            path: PathBuf::from("sales.csv"),
        });
        assert_eq!(load.exit_code(), 3);

        let strict = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 0,
        };
        assert_eq!(strict.exit_code(), 5);

        let warehouse = CliError::from(WarehouseError::QueryRejected(String::from("nope")));
        assert_eq!(warehouse.exit_code(), 6);
    }
}
