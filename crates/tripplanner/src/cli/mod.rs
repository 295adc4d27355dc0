//! Command-line interface for tripplanner.
//!
//! This module provides the CLI structure for the `tripplan` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    BudgetAddArgs, BudgetCommand, BudgetUpdateArgs, ChecklistAddArgs, ChecklistCommand,
    ChecklistUpdateArgs, ConfigCommand, CountdownCommand, DashboardCommand, DeleteArgs,
    DocumentAddArgs, DocumentCommand, DocumentStatusArg, DocumentUpdateArgs, ExportCommand,
    FlightAddArgs, FlightCommand, FlightUpdateArgs, ImportCommand, ItineraryAddArgs,
    ItineraryCommand, ItineraryUpdateArgs, ListArgs, OutputFormat, StatusCommand,
};

/// tripplan - Plan a trip from the terminal
///
/// Keeps flights, budget, itinerary, checklist and travel documents in a
/// local database, with a dashboard, a departure countdown and JSON backups.
#[derive(Debug, Parser)]
#[command(name = "tripplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
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
    /// Manage flights
    #[command(subcommand)]
    Flight(FlightCommand),

    /// Manage budget items
    #[command(subcommand)]
    Budget(BudgetCommand),

    /// Manage itinerary activities
    #[command(subcommand)]
    Itinerary(ItineraryCommand),

    /// Manage the preparation checklist
    #[command(subcommand)]
    Checklist(ChecklistCommand),

    /// Manage travel documents
    #[command(subcommand)]
    Document(DocumentCommand),

    /// Show totals, progress and what to do next
    Dashboard(DashboardCommand),

    /// Show days left until departure
    Countdown(CountdownCommand),

    /// Write all data to a JSON snapshot
    Export(ExportCommand),

    /// Replace all data with a JSON snapshot
    Import(ImportCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
