//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::RecordFields;

/// The six record fields, all required.
#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    /// Rental date (DD/MM/YYYY)
    #[arg(long)]
    pub date: String,

    /// Time of day (HH:MM)
    #[arg(long)]
    pub time: String,

    /// Registration plate
    #[arg(long)]
    pub plate: String,

    /// Vehicle name or model
    #[arg(long)]
    pub vehicle: String,

    /// Full name of the responsible person
    #[arg(long)]
    pub person: String,

    /// Partner (CERIZA, FOX CAR, ZEZGO, IZI, DIRECT)
    #[arg(long)]
    pub partner: String,
}

impl RecordArgs {
    /// Convert into record fields.
    #[must_use]
    pub fn into_fields(self) -> RecordFields {
        RecordFields {
            date: self.date,
            time: self.time,
            plate: self.plate,
            vehicle: self.vehicle,
            person: self.person,
            partner: self.partner,
        }
    }
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Staff member whose records to use
    #[arg(short, long)]
    pub user: String,

    /// Field values
    #[command(flatten)]
    pub record: RecordArgs,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Record id
    pub id: i64,

    /// Staff member whose records to use
    #[arg(short, long)]
    pub user: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Record id
    pub id: i64,

    /// Staff member whose records to use
    #[arg(short, long)]
    pub user: String,

    /// New field values
    #[command(flatten)]
    pub record: RecordArgs,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Record id
    pub id: i64,

    /// Staff member whose records to use
    #[arg(short, long)]
    pub user: String,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Staff member whose records to use
    #[arg(short, long)]
    pub user: String,

    /// Only vehicles containing this text (case-sensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Staff member whose records to use
    #[arg(short, long)]
    pub user: String,

    /// Only vehicles containing this text (case-sensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Directory to write the report to (defaults to the configured one)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Staff member whose partition to inspect
    #[arg(short, long)]
    pub user: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One record per line
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
}
