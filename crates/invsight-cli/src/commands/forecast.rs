use invsight_core::{ForecastSummary, SourceId};

use crate::error::CliError;

use super::CommandResult;

pub fn run() -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(ForecastSummary::reported())?;
    Ok(CommandResult::ok(data, vec![SourceId::Reported]))
}
