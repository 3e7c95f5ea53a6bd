mod cli;
mod commands;
mod error;
mod output;

use std::env;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            error!(exit_code = failure.exit_code(), error = %failure, "command failed");
            if cli.stream && !matches!(failure, CliError::StrictModeViolation { .. }) {
                // Best effort: stdout may be the thing that failed.
                let _ = output::render_stream_failure(io::stdout().lock(), &failure);
            }
            eprintln!("error: {failure}");
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let envelope = commands::run(cli)?;
    if cli.stream {
        output::render_stream(io::stdout().lock(), &envelope)?;
    } else {
        output::render(&mut io::stdout().lock(), &envelope, cli.format, cli.pretty)?;
    }

    if cli.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    Ok(())
}

/// `INVSIGHT_LOG` sets the filter (default `warn`); `INVSIGHT_LOG_JSON=1`
/// switches to JSON lines. Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("INVSIGHT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_json = env::var("INVSIGHT_LOG_JSON")
        .map(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
    };

    if let Err(error) = result {
        eprintln!("warning: tracing already initialized: {error}");
    }
}
