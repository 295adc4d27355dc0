//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and how their
//! arguments map onto record drafts and patches.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::model::{
    coerce_amount, normalize_time, BudgetPatch, ChecklistPatch, DocumentPatch, DocumentStatus,
    FlightPatch, ItineraryPatch, NewBudgetItem, NewChecklistItem, NewDocument, NewFlight,
    NewItineraryItem,
};

/// Arguments shared by every `list` subcommand.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments shared by every `delete` subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Identifier of the record to delete
    pub id: String,
}

// === Flights ===

/// Flight commands.
#[derive(Debug, Subcommand)]
pub enum FlightCommand {
    /// Add a flight
    Add(FlightAddArgs),
    /// List flights
    List(ListArgs),
    /// Change fields of a flight
    Update(FlightUpdateArgs),
    /// Delete a flight
    Delete(DeleteArgs),
}

/// Arguments for `flight add`.
#[derive(Debug, Args)]
pub struct FlightAddArgs {
    /// Departure airport or city
    #[arg(long)]
    pub origin: String,

    /// Arrival airport or city
    #[arg(long)]
    pub destination: String,

    /// Flight date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Ticket price; unreadable amounts count as 0
    #[arg(long, default_value = "0")]
    pub price: String,

    /// Airline name
    #[arg(long, default_value = "")]
    pub airline: String,
}

impl From<FlightAddArgs> for NewFlight {
    fn from(args: FlightAddArgs) -> Self {
        Self {
            origin: args.origin,
            destination: args.destination,
            date: args.date,
            price: args.price,
            airline: args.airline,
        }
    }
}

/// Arguments for `flight update`.
#[derive(Debug, Args)]
pub struct FlightUpdateArgs {
    /// Identifier of the flight
    pub id: String,

    /// New departure airport or city
    #[arg(long)]
    pub origin: Option<String>,

    /// New arrival airport or city
    #[arg(long)]
    pub destination: Option<String>,

    /// New flight date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// New ticket price
    #[arg(long)]
    pub price: Option<String>,

    /// New airline name
    #[arg(long)]
    pub airline: Option<String>,
}

impl From<FlightUpdateArgs> for FlightPatch {
    fn from(args: FlightUpdateArgs) -> Self {
        Self {
            origin: args.origin,
            destination: args.destination,
            date: args.date,
            price: args.price.as_deref().map(coerce_amount),
            airline: args.airline,
        }
    }
}

// === Budget ===

/// Budget commands.
#[derive(Debug, Subcommand)]
pub enum BudgetCommand {
    /// Add a budget item
    Add(BudgetAddArgs),
    /// List budget items
    List(ListArgs),
    /// Change fields of a budget item
    Update(BudgetUpdateArgs),
    /// Delete a budget item
    Delete(DeleteArgs),
}

/// Arguments for `budget add`.
#[derive(Debug, Args)]
pub struct BudgetAddArgs {
    /// Spending category, e.g. Hotel or Food
    #[arg(long)]
    pub category: String,

    /// Amount; unreadable amounts count as 0
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// What the money is for
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<BudgetAddArgs> for NewBudgetItem {
    fn from(args: BudgetAddArgs) -> Self {
        Self {
            category: args.category,
            amount: args.amount,
            description: args.description,
        }
    }
}

/// Arguments for `budget update`.
#[derive(Debug, Args)]
pub struct BudgetUpdateArgs {
    /// Identifier of the budget item
    pub id: String,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// New amount
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

impl From<BudgetUpdateArgs> for BudgetPatch {
    fn from(args: BudgetUpdateArgs) -> Self {
        Self {
            category: args.category,
            amount: args.amount.as_deref().map(coerce_amount),
            description: args.description,
        }
    }
}

// === Itinerary ===

/// Itinerary commands.
#[derive(Debug, Subcommand)]
pub enum ItineraryCommand {
    /// Add an activity
    Add(ItineraryAddArgs),
    /// List activities by date and time
    List(ListArgs),
    /// Change fields of an activity
    Update(ItineraryUpdateArgs),
    /// Delete an activity
    Delete(DeleteArgs),
}

fn parse_time(s: &str) -> Result<String, String> {
    normalize_time(s).map_err(|e| e.to_string())
}

/// Arguments for `itinerary add`.
#[derive(Debug, Args)]
pub struct ItineraryAddArgs {
    /// Day of the activity (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// What is planned
    #[arg(long)]
    pub activity: String,

    /// Where it happens
    #[arg(long, default_value = "")]
    pub location: String,

    /// Start time (HH:MM)
    #[arg(long, default_value = "", value_parser = parse_time)]
    pub time: String,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl From<ItineraryAddArgs> for NewItineraryItem {
    fn from(args: ItineraryAddArgs) -> Self {
        Self {
            date: args.date,
            activity: args.activity,
            location: args.location,
            time: args.time,
            notes: args.notes,
        }
    }
}

/// Arguments for `itinerary update`.
#[derive(Debug, Args)]
pub struct ItineraryUpdateArgs {
    /// Identifier of the activity
    pub id: String,

    /// New day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// New activity
    #[arg(long)]
    pub activity: Option<String>,

    /// New location
    #[arg(long)]
    pub location: Option<String>,

    /// New start time (HH:MM, empty to unschedule)
    #[arg(long, value_parser = parse_time)]
    pub time: Option<String>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<ItineraryUpdateArgs> for ItineraryPatch {
    fn from(args: ItineraryUpdateArgs) -> Self {
        Self {
            date: args.date,
            activity: args.activity,
            location: args.location,
            time: args.time,
            notes: args.notes,
        }
    }
}

// === Checklist ===

/// Checklist commands.
#[derive(Debug, Subcommand)]
pub enum ChecklistCommand {
    /// Add a checklist item
    Add(ChecklistAddArgs),
    /// List checklist items grouped by category
    List(ListArgs),
    /// Change fields of a checklist item
    Update(ChecklistUpdateArgs),
    /// Flip an item between done and not done
    Toggle {
        /// Identifier of the item
        id: String,
    },
    /// Delete a checklist item
    Delete(DeleteArgs),
}

/// Arguments for `checklist add`.
#[derive(Debug, Args)]
pub struct ChecklistAddArgs {
    /// What needs doing
    pub text: String,

    /// Grouping such as packing or bookings
    #[arg(long, default_value = "")]
    pub category: String,
}

impl From<ChecklistAddArgs> for NewChecklistItem {
    fn from(args: ChecklistAddArgs) -> Self {
        Self {
            text: args.text,
            category: args.category,
        }
    }
}

/// Arguments for `checklist update`.
#[derive(Debug, Args)]
pub struct ChecklistUpdateArgs {
    /// Identifier of the item
    pub id: String,

    /// New text
    #[arg(long)]
    pub text: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// Mark as done (true) or not done (false)
    #[arg(long)]
    pub completed: Option<bool>,
}

impl From<ChecklistUpdateArgs> for ChecklistPatch {
    fn from(args: ChecklistUpdateArgs) -> Self {
        Self {
            text: args.text,
            category: args.category,
            completed: args.completed,
        }
    }
}

// === Documents ===

/// Document commands.
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Add a travel document
    Add(DocumentAddArgs),
    /// List travel documents
    List(ListArgs),
    /// Change fields of a document
    Update(DocumentUpdateArgs),
    /// Delete a document
    Delete(DeleteArgs),
}

/// Arguments for `document add`.
#[derive(Debug, Args)]
pub struct DocumentAddArgs {
    /// Document type, e.g. Passport or Visa
    #[arg(value_name = "TYPE")]
    pub kind: String,

    /// Initial status
    #[arg(short, long, value_enum)]
    pub status: Option<DocumentStatusArg>,

    /// Free-form notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl From<DocumentAddArgs> for NewDocument {
    fn from(args: DocumentAddArgs) -> Self {
        Self {
            kind: args.kind,
            status: args.status.map(DocumentStatus::from),
            notes: args.notes,
        }
    }
}

/// Arguments for `document update`.
#[derive(Debug, Args)]
pub struct DocumentUpdateArgs {
    /// Identifier of the document
    pub id: String,

    /// New document type
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<String>,

    /// New status
    #[arg(short, long, value_enum)]
    pub status: Option<DocumentStatusArg>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<DocumentUpdateArgs> for DocumentPatch {
    fn from(args: DocumentUpdateArgs) -> Self {
        Self {
            kind: args.kind,
            status: args.status.map(DocumentStatus::from),
            notes: args.notes,
        }
    }
}

/// Document status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentStatusArg {
    /// Not started
    Pending,
    /// Being arranged
    InProgress,
    /// Ready
    Done,
}

impl From<DocumentStatusArg> for DocumentStatus {
    fn from(arg: DocumentStatusArg) -> Self {
        match arg {
            DocumentStatusArg::Pending => Self::Pending,
            DocumentStatusArg::InProgress => Self::InProgress,
            DocumentStatusArg::Done => Self::Done,
        }
    }
}

// === Summary and transfer ===

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Countdown command arguments.
#[derive(Debug, Args)]
pub struct CountdownCommand {
    /// Departure date (YYYY-MM-DD); defaults to `trip.departure_date`
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file, or `-` for stdout; defaults to
    /// `trip-planner-<date>.json` in the export directory
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Snapshot file to restore from; replaces all current data
    pub file: PathBuf,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
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

/// Output format for list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_status_arg_conversion() {
        assert_eq!(
            DocumentStatus::from(DocumentStatusArg::Pending),
            DocumentStatus::Pending
        );
        assert_eq!(
            DocumentStatus::from(DocumentStatusArg::InProgress),
            DocumentStatus::InProgress
        );
        assert_eq!(
            DocumentStatus::from(DocumentStatusArg::Done),
            DocumentStatus::Done
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_flight_update_coerces_price() {
        let patch = FlightPatch::from(FlightUpdateArgs {
            id: "f1".to_string(),
            origin: None,
            destination: None,
            date: None,
            price: Some("950.00 BRL".to_string()),
            airline: Some(String::new()),
        });

        assert!(patch.price.is_some_and(|price| (price - 950.0).abs() < f64::EPSILON));
        assert_eq!(patch.airline, Some(String::new()));
        assert!(patch.origin.is_none());
    }

    #[test]
    fn test_budget_update_without_amount() {
        let patch = BudgetPatch::from(BudgetUpdateArgs {
            id: "b1".to_string(),
            category: Some("Food".to_string()),
            amount: None,
            description: None,
        });

        assert!(patch.amount.is_none());
        assert_eq!(patch.category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_document_add_without_status() {
        let draft = NewDocument::from(DocumentAddArgs {
            kind: "Insurance".to_string(),
            status: None,
            notes: String::new(),
        });
        assert!(draft.status.is_none());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
