mod aggregates;
mod dashboard;
mod forecast;
mod products;
mod sql;
mod synthetic;

use std::time::Instant;

use invsight_core::{
    CachedTable, DashboardConfig, DatasetCache, Envelope, EnvelopeError, EnvelopeMeta, Panel,
    SourceId,
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub cache_hit: bool,
    pub source_chain: Vec<SourceId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<SourceId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            cache_hit: false,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Envelope error for a panel that degraded to a placeholder, tagged with the
/// source that could not supply it.
pub(crate) fn placeholder_error<T>(
    panel: &Panel<T>,
    code: &str,
    source: SourceId,
) -> Result<Option<EnvelopeError>, CliError> {
    match panel {
        Panel::Ready { .. } => Ok(None),
        Panel::Placeholder { reason } => {
            Ok(Some(EnvelopeError::new(code, reason.as_str())?.with_source(source)))
        }
    }
}

/// Per-invocation state shared by the command handlers.
pub struct Context {
    pub config: DashboardConfig,
    pub request_id: String,
    cache: DatasetCache,
}

impl Context {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            request_id: Uuid::new_v4().to_string(),
            cache: DatasetCache::new(),
        }
    }

    /// Load (or reuse) the primary dataset.
    pub fn dataset(&self) -> Result<CachedTable, CliError> {
        Ok(self.cache.load(&self.config.dataset_path)?)
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = DashboardConfig::from_env()
        .with_dataset(cli.dataset.clone())
        .with_synthetic(cli.synthetic.clone());
    let context = Context::new(config);
    execute(&context, &cli.command)
}

/// Run `command` and wrap its result in an envelope.
pub fn execute(context: &Context, command: &Command) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let command_result = match command {
        Command::Dashboard(args) => dashboard::run(context, args)?,
        Command::Kpi => aggregates::kpi(context)?,
        Command::Products => products::run(context)?,
        Command::Trend(args) => aggregates::trend(context, args)?,
        Command::Promotions => aggregates::promotions(context)?,
        Command::Correlation => aggregates::correlation(context)?,
        Command::Turnover => aggregates::turnover(context)?,
        Command::Forecast => forecast::run()?,
        Command::Synthetic => synthetic::run(context)?,
        Command::Sql(args) => sql::run(context, args)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        cache_hit,
        source_chain,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::new(
        context.request_id.clone(),
        source_chain,
        latency_ms,
        cache_hit,
    )?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    debug!(
        request_id = %meta.request_id,
        latency_ms,
        warnings = meta.warnings.len(),
        "command complete"
    );
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}
