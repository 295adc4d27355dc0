//! The planner: five collection stores over one shared storage handle.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::model::{BudgetItem, ChecklistItem, Document, Flight, ItineraryItem};
use crate::storage::Storage;
use crate::store::EntityStore;
use crate::transfer::{Collections, Snapshot};

/// Entry point for reading and changing a trip plan.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    /// Flights.
    pub flights: EntityStore<Flight>,
    /// Budget items.
    pub budget: EntityStore<BudgetItem>,
    /// Itinerary activities.
    pub itinerary: EntityStore<ItineraryItem>,
    /// Checklist items.
    pub checklist: EntityStore<ChecklistItem>,
    /// Travel documents.
    pub documents: EntityStore<Document>,
}

impl TripPlanner {
    /// Build the five stores over `storage`, keyed by `key_prefix`.
    #[must_use]
    pub fn new(storage: &Storage, key_prefix: &str) -> Self {
        Self {
            flights: EntityStore::new(storage.clone(), key_prefix),
            budget: EntityStore::new(storage.clone(), key_prefix),
            itinerary: EntityStore::new(storage.clone(), key_prefix),
            checklist: EntityStore::new(storage.clone(), key_prefix),
            documents: EntityStore::new(storage.clone(), key_prefix),
        }
    }

    /// A planner backed by a fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(&Storage::in_memory(), "trip")
    }

    /// Current contents of every collection.
    #[must_use]
    pub fn collections(&self) -> Collections {
        Collections {
            flights: self.flights.list(),
            budget: self.budget.list(),
            itinerary: self.itinerary.list(),
            checklist: self.checklist.list(),
            documents: self.documents.list(),
        }
    }

    /// Derive the dashboard as of `today`.
    #[must_use]
    pub fn dashboard(&self, today: NaiveDate, limits: &DashboardConfig) -> Dashboard {
        Dashboard::compute(&self.collections(), today, limits)
    }

    /// Snapshot every collection, stamped with `now`.
    #[must_use]
    pub fn export(&self, now: DateTime<Utc>) -> Snapshot {
        Snapshot::new(self.collections(), now)
    }

    /// Replace every collection with the contents of a validated snapshot.
    ///
    /// The five collections are written one after another; a backend failure
    /// part way through leaves the earlier ones replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if a collection cannot be written.
    pub fn import(&self, snapshot: &Snapshot) -> Result<()> {
        let collections = &snapshot.collections;
        self.flights.replace_all(&collections.flights)?;
        self.budget.replace_all(&collections.budget)?;
        self.itinerary.replace_all(&collections.itinerary)?;
        self.checklist.replace_all(&collections.checklist)?;
        self.documents.replace_all(&collections.documents)?;

        info!(
            version = %snapshot.version,
            records = collections.total_records(),
            "Imported snapshot"
        );
        Ok(())
    }

    /// Validate a snapshot document and import it.
    ///
    /// Nothing is written unless the whole document validates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotValidation`](crate::Error::SnapshotValidation)
    /// for an invalid document, or a storage error if a write fails.
    pub fn import_json(&self, json: &str) -> Result<()> {
        let snapshot = Snapshot::from_json(json)?;
        self.import(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::NextTasks;
    use crate::model::{DocumentStatus, NewBudgetItem, NewChecklistItem, NewDocument, NewFlight};
    use crate::storage::SqliteStore;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> TripPlanner {
        let planner = TripPlanner::in_memory();
        planner
            .flights
            .create(NewFlight {
                origin: "GRU".to_string(),
                destination: "FCO".to_string(),
                date: date(2025, 11, 20),
                price: "1200.50".to_string(),
                airline: "TAP".to_string(),
            })
            .unwrap();
        planner
            .budget
            .create(NewBudgetItem {
                category: "Hotel".to_string(),
                amount: "800".to_string(),
                description: String::new(),
            })
            .unwrap();
        planner
            .checklist
            .create(NewChecklistItem {
                text: "Buy adapter".to_string(),
                category: "packing".to_string(),
            })
            .unwrap();
        planner
            .documents
            .create(NewDocument {
                kind: "Passport".to_string(),
                status: Some(DocumentStatus::Done),
                notes: String::new(),
            })
            .unwrap();
        planner
    }

    #[test]
    fn test_export_import_round_trip() {
        let source = seeded();
        let now = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let json = source.export(now).to_json_pretty().unwrap();

        let target = TripPlanner::in_memory();
        target.import_json(&json).unwrap();

        assert_eq!(target.collections(), source.collections());
    }

    #[test]
    fn test_import_missing_collection_changes_nothing() {
        let planner = seeded();
        let before = planner.collections();

        let mut doc = serde_json::to_value(TripPlanner::in_memory().export(Utc::now())).unwrap();
        doc.as_object_mut().unwrap().remove("documents");

        let err = planner.import_json(&doc.to_string()).unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(planner.collections(), before);
    }

    #[test]
    fn test_import_empty_snapshot_clears() {
        let planner = seeded();
        let empty = Snapshot::new(Collections::default(), Utc::now());

        planner.import(&empty).unwrap();
        assert_eq!(planner.collections().total_records(), 0);
    }

    #[test]
    fn test_dashboard_from_stores() {
        let planner = seeded();
        let dashboard = planner.dashboard(date(2025, 11, 1), &DashboardConfig::default());

        assert!((dashboard.total_spend - 800.0).abs() < f64::EPSILON);
        assert_eq!(dashboard.checklist_progress, 0);
        assert_eq!(dashboard.documents.to_string(), "1/1");
        assert_eq!(dashboard.flight_count, 1);
        assert!(matches!(dashboard.next_tasks, NextTasks::Pending(ref tasks) if tasks.len() == 1));

        let item = planner.checklist.list().remove(0);
        planner.checklist.toggle_completion(&item.id).unwrap();

        let dashboard = planner.dashboard(date(2025, 11, 1), &DashboardConfig::default());
        assert_eq!(dashboard.checklist_progress, 100);
        assert_eq!(dashboard.next_tasks, NextTasks::AllCaughtUp);
    }

    #[test]
    fn test_stores_share_storage() {
        let storage = Storage::in_memory();
        let first = TripPlanner::new(&storage, "trip");
        let second = TripPlanner::new(&storage, "trip");

        first
            .checklist
            .create(NewChecklistItem {
                text: "Check in".to_string(),
                category: String::new(),
            })
            .unwrap();

        assert_eq!(second.checklist.list().len(), 1);
    }

    #[test]
    fn test_amounts_keep_full_precision() {
        let planner = TripPlanner::in_memory();
        let created = planner
            .budget
            .create(NewBudgetItem {
                category: "Food".to_string(),
                amount: "3.8054949529136533".to_string(),
                description: String::new(),
            })
            .unwrap();

        let listed = planner.budget.list();
        assert_eq!(listed[0].amount.to_bits(), created.amount.to_bits());

        let json = planner.export(Utc::now()).to_json_pretty().unwrap();
        let target = TripPlanner::in_memory();
        target.import_json(&json).unwrap();
        assert_eq!(
            target.budget.list()[0].amount.to_bits(),
            created.amount.to_bits()
        );
    }

    #[test]
    fn test_sqlite_file_survives_reopen() {
        let path = std::env::temp_dir().join(format!(
            "tripplanner_planner_{}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let before = {
            let storage = Storage::new(SqliteStore::open(&path).unwrap());
            let planner = TripPlanner::new(&storage, "trip");
            planner
                .flights
                .create(NewFlight {
                    origin: "GRU".to_string(),
                    destination: "GOA".to_string(),
                    date: date(2025, 12, 1),
                    price: "980.25".to_string(),
                    airline: "ITA".to_string(),
                })
                .unwrap();
            planner
                .checklist
                .create(NewChecklistItem {
                    text: "Print tickets".to_string(),
                    category: "documents".to_string(),
                })
                .unwrap();
            planner.collections()
        };

        let storage = Storage::new(SqliteStore::open(&path).unwrap());
        let reopened = TripPlanner::new(&storage, "trip");
        assert_eq!(reopened.collections(), before);
        assert_eq!(before.total_records(), 2);

        drop(reopened);
        drop(storage);
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
