//! CLI-specific error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::SchemaError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("CLI_IO_ERROR: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Some inputs failed validation; each was already reported on stdout
    #[error("CLI_REJECTED: {rejected} of {total} record(s) rejected")]
    Rejected { rejected: usize, total: usize },
}

impl CliError {
    /// Stable code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CLI_CONFIG_ERROR",
            CliError::Schema(e) => e.code().code(),
            CliError::Io(_) | CliError::Json(_) => "CLI_IO_ERROR",
            CliError::Rejected { .. } => "CLI_REJECTED",
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
