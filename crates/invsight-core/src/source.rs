use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Where the data behind a response came from; recorded in envelope metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// The primary sales/inventory dataset file.
    Dataset,
    /// The optional synthetic demand sample file.
    Synthetic,
    /// The DuckDB analytical copy.
    Warehouse,
    /// Static, externally reported figures.
    Reported,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Synthetic => "synthetic",
            Self::Warehouse => "warehouse",
            Self::Reported => "reported",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
