//! CLI command implementations

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::schema::{save_definition, validate_record, SchemaError, SchemaRegistry, UnknownKeyPolicy};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_line, write_response};

/// Counts from one `validate` run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidateSummary {
    pub accepted: usize,
    pub rejected: usize,
}

impl ValidateSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Validate {
            type_name,
            config,
            reject_unknown,
        } => {
            let config = load_config(config.as_deref())?;
            let policy = if reject_unknown {
                UnknownKeyPolicy::Reject
            } else {
                config.unknown_keys
            };
            let registry = build_registry(&config)?;

            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let summary = validate(&registry, &type_name, policy, stdin.lock(), &mut stdout)?;

            if summary.rejected > 0 {
                return Err(CliError::Rejected {
                    rejected: summary.rejected,
                    total: summary.total(),
                });
            }
            Ok(())
        }
        Command::Collections { config } => {
            let config = load_config(config.as_deref())?;
            let registry = build_registry(&config)?;
            collections(&registry, &mut io::stdout())
        }
        Command::Export { out, config } => {
            let config = load_config(config.as_deref())?;
            let registry = build_registry(&config)?;
            let written = export(&registry, &out)?;
            write_line(&mut io::stdout(), &serde_json::json!({ "status": "ok", "written": written }))
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(path)?;
    Logger::set_min_severity(config.log_level);
    log_event(Event::ConfigLoaded);
    Ok(config)
}

/// Built-in catalog plus any definitions under `schema_dir`
pub fn build_registry(config: &Config) -> CliResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::with_builtin()?;
    if let Some(dir) = &config.schema_dir {
        registry.load_dir(dir)?;
    }
    Ok(registry)
}

/// Validates every JSON line from `input`, answering each on `output`.
///
/// Unknown type names fail before any input is read. Malformed JSON lines
/// and invalid records are answered with an error response and counted as
/// rejected; the stream continues.
pub fn validate<R: BufRead, W: Write>(
    registry: &SchemaRegistry,
    type_name: &str,
    policy: UnknownKeyPolicy,
    input: R,
    output: &mut W,
) -> CliResult<ValidateSummary> {
    let def = registry
        .definition(type_name)
        .ok_or_else(|| SchemaError::unknown_type(type_name))?;

    let mut summary = ValidateSummary::default();

    for line in read_requests(input) {
        let raw = match line? {
            Ok(raw) => raw,
            Err(message) => {
                summary.rejected += 1;
                write_error(output, "CLI_INVALID_JSON", &message, &[])?;
                continue;
            }
        };

        match validate_record(def, &raw, policy) {
            Ok(record) => {
                summary.accepted += 1;
                log_event_with_fields(Event::ValidationPassed, &[("type_name", type_name)]);
                write_response(output, record.type_name(), record.collection(), record.to_json())?;
            }
            Err(report) => {
                summary.rejected += 1;
                let count = report.len().to_string();
                log_event_with_fields(
                    Event::ValidationRejected,
                    &[("type_name", type_name), ("errors", count.as_str())],
                );
                let err = SchemaError::validation_failed(report);
                let errors = err.report().map(|r| r.errors.as_slice()).unwrap_or_default();
                write_error(output, err.code().code(), err.message(), errors)?;
            }
        }
    }

    Ok(summary)
}

/// Writes `{type_name: collection}` for every registered type
pub fn collections<W: Write>(registry: &SchemaRegistry, output: &mut W) -> CliResult<()> {
    let map: BTreeMap<String, String> = registry.collections().into_iter().collect();
    write_line(output, &map)
}

/// Saves every registered definition under `out`; returns file names
pub fn export(registry: &SchemaRegistry, out: &Path) -> CliResult<Vec<String>> {
    let mut written = Vec::with_capacity(registry.len());
    for def in registry.definitions() {
        let path = save_definition(out, def)?;
        written.push(path.display().to_string());
    }

    let count = written.len().to_string();
    let dir = out.display().to_string();
    log_event_with_fields(
        Event::SchemasExported,
        &[("dir", dir.as_str()), ("count", count.as_str())],
    );
    Ok(written)
}
