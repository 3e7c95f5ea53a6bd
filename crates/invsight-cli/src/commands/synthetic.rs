use invsight_core::{load_synthetic_series, EnvelopeError, SourceId, SyntheticOutcome};

use crate::error::CliError;

use super::{CommandResult, Context};

pub fn run(context: &Context) -> Result<CommandResult, CliError> {
    let outcome = load_synthetic_series(&context.config.synthetic_path);
    let unavailable = match &outcome {
        SyntheticOutcome::Available { .. } => None,
        SyntheticOutcome::Unavailable { reason, .. } => Some(reason.clone()),
    };

    let mut result = CommandResult::ok(serde_json::to_value(outcome)?, vec![SourceId::Synthetic]);
    if let Some(reason) = unavailable {
        let error = EnvelopeError::new("synthetic_unavailable", reason.as_str())?
            .with_source(SourceId::Synthetic);
        result = result
            .with_warning(format!("synthetic demand sample unavailable: {reason}"))
            .with_errors(vec![error]);
    }
    Ok(result)
}
