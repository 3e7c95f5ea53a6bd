use invsight_core::{Dashboard, SourceId};

use crate::cli::DashboardArgs;
use crate::error::CliError;

use super::{placeholder_error, CommandResult, Context};

pub fn run(context: &Context, args: &DashboardArgs) -> Result<CommandResult, CliError> {
    let dataset = context.dataset()?;
    let report = Dashboard::render(
        &dataset.table,
        args.product.as_deref(),
        &context.config.synthetic_path,
    )?;

    let warnings = report.warnings.clone();
    let errors: Vec<_> = [
        placeholder_error(&report.correlation.panel, "insufficient_data", SourceId::Dataset)?,
        placeholder_error(&report.synthetic.panel, "synthetic_unavailable", SourceId::Synthetic)?,
    ]
    .into_iter()
    .flatten()
    .collect();
    let data = serde_json::to_value(report)?;

    Ok(CommandResult::ok(
        data,
        vec![SourceId::Dataset, SourceId::Synthetic, SourceId::Reported],
    )
    .with_cache_hit(dataset.cache_hit)
    .with_warnings(warnings)
    .with_errors(errors))
}
