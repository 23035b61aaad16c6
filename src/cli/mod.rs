//! CLI module
//!
//! Provides command-line interface for:
//! - validate: check JSON records from stdin against a record type
//! - collections: print the type -> collection mapping
//! - export: write definitions to disk

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_registry, collections, export, run, run_command, validate, ValidateSummary};
pub use errors::{CliError, CliResult};
