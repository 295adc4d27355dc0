//! `tripplan` - CLI for tripplanner
//!
//! This binary provides the command-line interface for editing a trip plan,
//! viewing its dashboard and moving it in and out of JSON snapshots.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context};
use chrono::{Local, Utc};
use clap::Parser;

use tripplanner::cli::{
    BudgetCommand, ChecklistCommand, Cli, Command, ConfigCommand, CountdownCommand,
    DocumentCommand, ExportCommand, FlightCommand, ItineraryCommand, OutputFormat,
};
use tripplanner::model::{BudgetItem, ChecklistItem, Document, Flight, ItineraryItem, Record};
use tripplanner::transfer::{default_export_file_name, read_snapshot_file, write_snapshot_file};
use tripplanner::{
    days_until, init_logging, Config, EntityStore, NextTasks, SqliteStore, Storage, TripPlanner,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Loaded on demand so `config path` and `config validate` still work
    // while the default config file is broken
    let config_path = cli.config;
    let load_config =
        || Config::load_from(config_path.clone()).context("failed to load configuration");

    match cli.command {
        Command::Flight(cmd) => {
            let config = load_config()?;
            handle_flight(&open_planner(&config)?.0.flights, cmd, &config)
        }
        Command::Budget(cmd) => {
            let config = load_config()?;
            handle_budget(&open_planner(&config)?.0.budget, cmd, &config)
        }
        Command::Itinerary(cmd) => {
            handle_itinerary(&open_planner(&load_config()?)?.0.itinerary, cmd)
        }
        Command::Checklist(cmd) => {
            handle_checklist(&open_planner(&load_config()?)?.0.checklist, cmd)
        }
        Command::Document(cmd) => handle_document(&open_planner(&load_config()?)?.0.documents, cmd),
        Command::Dashboard(cmd) => {
            let config = load_config()?;
            handle_dashboard(&open_planner(&config)?.0, &config, cmd.json)
        }
        Command::Countdown(cmd) => handle_countdown(&load_config()?, &cmd),
        Command::Export(cmd) => {
            let config = load_config()?;
            handle_export(&open_planner(&config)?.0, &config, cmd)
        }
        Command::Import(cmd) => handle_import(&open_planner(&load_config()?)?.0, &cmd.file),
        Command::Status(cmd) => {
            let config = load_config()?;
            let (planner, backend) = open_planner(&config)?;
            handle_status(&planner, &backend, &config, cmd.json)
        }
        Command::Config(cmd) => handle_config(config_path.clone(), cmd),
    }
}

/// Open the configured database and build the planner over it.
fn open_planner(config: &Config) -> anyhow::Result<(TripPlanner, Rc<SqliteStore>)> {
    let database_path = config.database_path();
    let backend = Rc::new(
        SqliteStore::open(&database_path)
            .with_context(|| format!("failed to open {}", database_path.display()))?,
    );
    let planner = TripPlanner::new(
        &Storage::from_shared(backend.clone()),
        &config.storage.key_prefix,
    );
    Ok((planner, backend))
}

// === Generic record handlers ===

fn print_records<R: Record>(
    records: &[R],
    format: OutputFormat,
    line: impl Fn(&R) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("No {} yet.", R::KIND);
            }
            for record in records {
                println!("{}", line(record));
            }
        }
    }
    Ok(())
}

fn add_record<R: Record>(
    store: &EntityStore<R>,
    draft: R::Draft,
    line: impl Fn(&R) -> String,
) -> anyhow::Result<()> {
    let record = store
        .create(draft)
        .with_context(|| format!("failed to save {}", R::KIND))?;
    println!("Added {}", line(&record));
    Ok(())
}

fn update_record<R: Record>(
    store: &EntityStore<R>,
    id: &str,
    patch: R::Patch,
    line: impl Fn(&R) -> String,
) -> anyhow::Result<()> {
    match store
        .update(id, patch)
        .with_context(|| format!("failed to save {}", R::KIND))?
    {
        Some(record) => println!("Updated {}", line(&record)),
        None => println!("No {} record with id {id}", R::KIND),
    }
    Ok(())
}

fn delete_record<R: Record>(store: &EntityStore<R>, id: &str) -> anyhow::Result<()> {
    let existed = store.get(id).is_some();
    store
        .delete(id)
        .with_context(|| format!("failed to save {}", R::KIND))?;
    if existed {
        println!("Deleted {id}");
    } else {
        println!("No {} record with id {id}", R::KIND);
    }
    Ok(())
}

// === Per-kind handlers ===

fn flight_line(flight: &Flight, config: &Config) -> String {
    let mut line = format!(
        "{}  {}  {} -> {}  {}",
        flight.id,
        flight.date,
        flight.origin,
        flight.destination,
        config.format_money(flight.price)
    );
    if !flight.airline.is_empty() {
        line.push_str(&format!("  {}", flight.airline));
    }
    line
}

fn handle_flight(
    store: &EntityStore<Flight>,
    cmd: FlightCommand,
    config: &Config,
) -> anyhow::Result<()> {
    let line = |flight: &Flight| flight_line(flight, config);
    match cmd {
        FlightCommand::Add(args) => add_record(store, args.into(), line),
        FlightCommand::List(args) => print_records(&store.list(), args.format, line),
        FlightCommand::Update(args) => {
            let id = args.id.clone();
            update_record(store, &id, args.into(), line)
        }
        FlightCommand::Delete(args) => delete_record(store, &args.id),
    }
}

fn budget_line(item: &BudgetItem, config: &Config) -> String {
    let mut line = format!(
        "{}  {}  {}",
        item.id,
        item.category,
        config.format_money(item.amount)
    );
    if !item.description.is_empty() {
        line.push_str(&format!("  {}", item.description));
    }
    line
}

fn handle_budget(
    store: &EntityStore<BudgetItem>,
    cmd: BudgetCommand,
    config: &Config,
) -> anyhow::Result<()> {
    let line = |item: &BudgetItem| budget_line(item, config);
    match cmd {
        BudgetCommand::Add(args) => add_record(store, args.into(), line),
        BudgetCommand::List(args) => {
            let items = store.list();
            print_records(&items, args.format, line)?;
            if args.format == OutputFormat::Plain && !items.is_empty() {
                let total: f64 = items.iter().map(|item| item.amount).sum();
                println!("Total: {}", config.format_money(total));
            }
            Ok(())
        }
        BudgetCommand::Update(args) => {
            let id = args.id.clone();
            update_record(store, &id, args.into(), line)
        }
        BudgetCommand::Delete(args) => delete_record(store, &args.id),
    }
}

fn itinerary_line(item: &ItineraryItem) -> String {
    let mut line = format!("{}  {}", item.id, item.date);
    if !item.time.is_empty() {
        line.push_str(&format!(" {}", item.time));
    }
    line.push_str(&format!("  {}", item.activity));
    if !item.location.is_empty() {
        line.push_str(&format!(" @ {}", item.location));
    }
    line
}

fn handle_itinerary(
    store: &EntityStore<ItineraryItem>,
    cmd: ItineraryCommand,
) -> anyhow::Result<()> {
    match cmd {
        ItineraryCommand::Add(args) => add_record(store, args.into(), itinerary_line),
        ItineraryCommand::List(args) => {
            print_records(&store.list_by_date(), args.format, itinerary_line)
        }
        ItineraryCommand::Update(args) => {
            let id = args.id.clone();
            update_record(store, &id, args.into(), itinerary_line)
        }
        ItineraryCommand::Delete(args) => delete_record(store, &args.id),
    }
}

fn checklist_line(item: &ChecklistItem) -> String {
    let mark = if item.completed { 'x' } else { ' ' };
    format!("[{mark}] {}  ({})", item.text, item.id)
}

fn handle_checklist(
    store: &EntityStore<ChecklistItem>,
    cmd: ChecklistCommand,
) -> anyhow::Result<()> {
    match cmd {
        ChecklistCommand::Add(args) => add_record(store, args.into(), checklist_line),
        ChecklistCommand::List(args) => match args.format {
            OutputFormat::Json => print_records(&store.list(), args.format, checklist_line),
            OutputFormat::Plain => {
                let groups = store.list_by_category();
                if groups.is_empty() {
                    println!("No checklist yet.");
                }
                for (category, items) in groups {
                    let heading = if category.is_empty() {
                        "Uncategorized"
                    } else {
                        category.as_str()
                    };
                    println!("{heading}");
                    for item in &items {
                        println!("  {}", checklist_line(item));
                    }
                }
                Ok(())
            }
        },
        ChecklistCommand::Update(args) => {
            let id = args.id.clone();
            update_record(store, &id, args.into(), checklist_line)
        }
        ChecklistCommand::Toggle { id } => {
            match store
                .toggle_completion(&id)
                .context("failed to save checklist")?
            {
                Some(item) => println!("{}", checklist_line(&item)),
                None => println!("No checklist record with id {id}"),
            }
            Ok(())
        }
        ChecklistCommand::Delete(args) => delete_record(store, &args.id),
    }
}

fn document_line(doc: &Document) -> String {
    let mut line = format!("{}  {}  [{}]", doc.id, doc.kind, doc.status);
    if !doc.notes.is_empty() {
        line.push_str(&format!("  {}", doc.notes));
    }
    line
}

fn handle_document(store: &EntityStore<Document>, cmd: DocumentCommand) -> anyhow::Result<()> {
    match cmd {
        DocumentCommand::Add(args) => add_record(store, args.into(), document_line),
        DocumentCommand::List(args) => print_records(&store.list(), args.format, document_line),
        DocumentCommand::Update(args) => {
            let id = args.id.clone();
            update_record(store, &id, args.into(), document_line)
        }
        DocumentCommand::Delete(args) => delete_record(store, &args.id),
    }
}

// === Summary and transfer ===

fn handle_dashboard(planner: &TripPlanner, config: &Config, json: bool) -> anyhow::Result<()> {
    let dashboard = planner.dashboard(Local::now().date_naive(), &config.dashboard);

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("{}", config.trip.name);
    println!("{}", "=".repeat(config.trip.name.chars().count()));
    if let Some(departure) = config.trip.departure_date {
        println!(
            "Departure:     {departure} ({} days)",
            days_until(departure, Utc::now())
        );
    }
    println!("Budget:        {}", config.format_money(dashboard.total_spend));
    println!(
        "Flights:       {} ({})",
        dashboard.flight_count,
        config.format_money(dashboard.flight_spend)
    );
    println!("Checklist:     {}%", dashboard.checklist_progress);
    println!("Documents:     {}", dashboard.documents);
    println!("Activities:    {}", dashboard.itinerary_count);
    println!();
    println!("Next tasks");
    match &dashboard.next_tasks {
        NextTasks::Pending(tasks) => {
            for task in tasks {
                println!("  - {task}");
            }
        }
        NextTasks::AllCaughtUp => println!("  All caught up!"),
    }
    Ok(())
}

fn handle_countdown(config: &Config, cmd: &CountdownCommand) -> anyhow::Result<()> {
    let departure = cmd.date.or(config.trip.departure_date).ok_or_else(|| {
        anyhow!("no departure date; pass --date or set trip.departure_date in the config")
    })?;
    let days = days_until(departure, Utc::now());
    println!("{days} days until {} ({departure})", config.trip.name);
    Ok(())
}

fn handle_export(planner: &TripPlanner, config: &Config, cmd: ExportCommand) -> anyhow::Result<()> {
    let snapshot = planner.export(Utc::now());

    let path = match cmd.output {
        Some(path) if path == Path::new("-") => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", snapshot.to_json_pretty()?)?;
            return Ok(());
        }
        Some(path) => path,
        None => config
            .export_dir()
            .join(default_export_file_name(Local::now().date_naive())),
    };

    write_snapshot_file(&path, &snapshot)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Exported {} records to {}",
        snapshot.collections.total_records(),
        path.display()
    );
    Ok(())
}

fn handle_import(planner: &TripPlanner, file: &Path) -> anyhow::Result<()> {
    let snapshot = read_snapshot_file(file)?;
    planner
        .import(&snapshot)
        .context("import stopped part way; re-run it to finish")?;
    println!(
        "Imported {} records from {}",
        snapshot.collections.total_records(),
        file.display()
    );
    Ok(())
}

fn handle_status(
    planner: &TripPlanner,
    backend: &SqliteStore,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let stats = backend.stats()?;
    let collections = planner.collections();
    let counts = [
        ("flights", collections.flights.len()),
        ("budget", collections.budget.len()),
        ("itinerary", collections.itinerary.len()),
        ("checklist", collections.checklist.len()),
        ("documents", collections.documents.len()),
    ];

    if json {
        let records: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(name, count)| ((*name).to_string(), serde_json::Value::from(*count)))
            .collect();
        let status = serde_json::json!({
            "database_path": backend.path(),
            "key_prefix": config.storage.key_prefix,
            "storage": stats,
            "records": records,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("tripplan status");
        println!("---------------");
        println!("Database:      {}", backend.path().display());
        println!("Key prefix:    {}", config.storage.key_prefix);
        println!("Keys stored:   {}", stats.total_keys);
        println!("Data size:     {} bytes", stats.total_bytes);
        println!("File size:     {} bytes", stats.db_size_bytes);
        match stats.last_write {
            Some(at) => println!(
                "Last write:    {}",
                at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ),
            None => println!("Last write:    never"),
        }
        println!();
        for (name, count) in counts {
            println!("{name:<14} {count}");
        }
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config =
                Config::load_from(config_path).context("failed to load configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key prefix:         {}", config.storage.key_prefix);
                println!();
                println!("[Trip]");
                println!("  Name:               {}", config.trip.name);
                match config.trip.departure_date {
                    Some(date) => println!("  Departure:          {date}"),
                    None => println!("  Departure:          (not set)"),
                }
                println!("  Currency:           {}", config.trip.currency_symbol);
                println!();
                println!("[Dashboard]");
                println!(
                    "  Checklist tasks:    {}",
                    config.dashboard.max_checklist_tasks
                );
                println!(
                    "  Upcoming activities: {}",
                    config.dashboard.max_upcoming_activities
                );
                println!(
                    "  Pending documents:  {}",
                    config.dashboard.max_pending_documents
                );
                println!();
                println!("[Export]");
                println!("  Directory:          {}", config.export_dir().display());
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            validate_config_file(&path)?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

/// Load `path` through the full config stack and report why it is rejected.
fn validate_config_file(path: &Path) -> anyhow::Result<Config> {
    Config::load_from(Some(path.to_path_buf()))
        .with_context(|| format!("configuration {} is invalid", path.display()))
}
