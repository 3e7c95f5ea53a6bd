pub mod stream_writer;

use std::io::Write;

use invsight_core::Envelope;
use serde_json::{json, Value};

use self::stream_writer::{NdjsonStreamWriter, StreamEventError};
use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render<W: Write>(
    writer: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(writer, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            writeln!(writer, "{payload}")?;
        }
        OutputFormat::Table => render_table(writer, envelope)?,
    }

    Ok(())
}

/// Stream a finished envelope. Envelope errors are degraded sources, so the
/// run ends `partial` rather than `error`.
pub fn render_stream<W: Write>(writer: W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    let mut writer = NdjsonStreamWriter::new(writer);

    writer.emit_start(Some(json!({
        "request_id": envelope.meta.request_id,
        "schema_version": envelope.meta.schema_version,
    })))?;

    writer.emit_progress(Some(json!({
        "phase": "command_complete",
        "warning_count": envelope.meta.warnings.len(),
        "error_count": envelope.errors.len(),
    })))?;

    writer.emit_chunk(Some(serde_json::to_value(envelope)?))?;

    for error in &envelope.errors {
        let data = error
            .source
            .map(|source| json!({ "source": source.as_str() }));
        writer.emit_error(
            StreamEventError::new(error.code.clone(), error.message.clone()),
            data,
        )?;
    }

    writer.emit_end(Some(json!({
        "status": if envelope.errors.is_empty() { "ok" } else { "partial" },
        "warning_count": envelope.meta.warnings.len(),
        "error_count": envelope.errors.len(),
    })))?;

    Ok(())
}

/// Stream events for a command that failed before producing an envelope.
pub fn render_stream_failure<W: Write>(writer: W, error: &CliError) -> Result<(), CliError> {
    let mut writer = NdjsonStreamWriter::new(writer);
    writer.emit_error(
        StreamEventError::new(error_code(error), error.to_string()),
        Some(json!({ "exit_code": error.exit_code() })),
    )?;
    writer.emit_end(Some(json!({ "status": "error" })))?;
    Ok(())
}

fn error_code(error: &CliError) -> &'static str {
    match error {
        CliError::Validation(_) => "validation_error",
        CliError::Selection(_) => "unknown_product",
        CliError::Load(_) => "load_error",
        CliError::Command(_) => "command_error",
        CliError::StrictModeViolation { .. } => "strict_mode_violation",
        CliError::Serialization(_) => "serialization_error",
        CliError::Warehouse(_) => "warehouse_error",
        CliError::Io(_) => "io_error",
    }
}

fn render_table<W: Write>(writer: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(writer, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(writer, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(writer, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(
        writer,
        "sources     : {}",
        envelope
            .meta
            .source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    writeln!(writer, "latency_ms  : {}", envelope.meta.latency_ms)?;
    writeln!(writer, "cache_hit   : {}", envelope.meta.cache_hit)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(writer, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(writer, "  - {warning}")?;
        }
    }

    writeln!(writer, "data:")?;
    let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
    for line in pretty_data.lines() {
        writeln!(writer, "  {line}")?;
    }

    if !envelope.errors.is_empty() {
        writeln!(writer, "errors:")?;
        for error in &envelope.errors {
            writeln!(writer, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}
