//! Command-line interface for rentbook.
//!
//! This module provides the CLI structure for the `rentbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ExportCommand, ListCommand,
    OutputFormat, RecordArgs, ShowCommand, StatusCommand,
};

/// rentbook - Vehicle rental records per staff member
///
/// Keeps each staff member's rentals in a separate local database, with
/// search, editing and PDF export.
#[derive(Debug, Parser)]
#[command(name = "rentbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a vehicle record
    Add(AddCommand),

    /// Show one record
    Show(ShowCommand),

    /// Replace every field of a record
    Edit(EditCommand),

    /// Delete a record
    Delete(DeleteCommand),

    /// List records sorted by date and time
    List(ListCommand),

    /// Export records to a PDF report
    Export(ExportCommand),

    /// Show partition status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Logging verbosity selected by `-v` and `-q`.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
