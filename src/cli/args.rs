//! CLI argument definitions using clap
//!
//! Commands:
//! - recordschema validate --type <TYPE> [--config <path>] [--reject-unknown]
//! - recordschema collections [--config <path>]
//! - recordschema export --out <dir> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordschema - validate JSON records against declared record types
#[derive(Parser, Debug)]
#[command(name = "recordschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON object per stdin line
    Validate {
        /// Record type name (e.g. User, Product, PartnerLead)
        #[arg(long = "type", value_name = "TYPE")]
        type_name: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Reject undeclared keys regardless of the configured policy
        #[arg(long)]
        reject_unknown: bool,
    },

    /// Print the type -> collection mapping
    Collections {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write every registered definition as JSON
    Export {
        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
