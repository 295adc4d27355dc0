//! Whole-planner snapshots for backup and restore.
//!
//! A snapshot is a single JSON object holding all five collections plus an
//! `exportDate` and a format `version`. Parsing validates the whole document
//! before anything is returned, so a rejected file never reaches the stores.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{BudgetItem, ChecklistItem, Document, EntityKind, Flight, ItineraryItem};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// The five collections, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    /// Flights.
    pub flights: Vec<Flight>,
    /// Budget items.
    pub budget: Vec<BudgetItem>,
    /// Itinerary activities.
    pub itinerary: Vec<ItineraryItem>,
    /// Checklist items.
    pub checklist: Vec<ChecklistItem>,
    /// Travel documents.
    pub documents: Vec<Document>,
}

impl Collections {
    /// Number of records across all collections.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.flights.len()
            + self.budget.len()
            + self.itinerary.len()
            + self.checklist.len()
            + self.documents.len()
    }
}

/// Serialized form of the whole planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All collections.
    #[serde(flatten)]
    pub collections: Collections,
    /// When the snapshot was taken.
    pub export_date: Option<DateTime<Utc>>,
    /// Format version.
    pub version: String,
}

impl Snapshot {
    /// Wrap collections into a snapshot taken at `now`.
    #[must_use]
    pub fn new(collections: Collections, now: DateTime<Utc>) -> Self {
        Self {
            collections,
            export_date: Some(now),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Parse and validate a snapshot document.
    ///
    /// The document must be an object with a non-empty string `version` and
    /// all five collections present as arrays whose elements parse as
    /// records. Unknown fields are ignored. An unreadable `exportDate` is
    /// dropped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SnapshotValidation`] describing the first problem found.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::snapshot(format!("not valid JSON: {e}")))?;
        let Value::Object(mut object) = value else {
            return Err(Error::snapshot("expected a JSON object"));
        };

        let version = match object.get("version") {
            Some(Value::String(version)) if !version.trim().is_empty() => version.clone(),
            Some(_) => return Err(Error::snapshot("`version` must be a non-empty string")),
            None => return Err(Error::snapshot("missing `version`")),
        };
        if version != SNAPSHOT_VERSION {
            warn!(version = %version, "Importing snapshot with unrecognized version");
        }

        // Check every key before parsing any records so the error names the
        // structural problem first.
        for kind in EntityKind::ALL {
            match object.get(kind.as_str()) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(Error::snapshot(format!("`{kind}` must be an array")));
                }
                None => return Err(Error::snapshot(format!("missing `{kind}`"))),
            }
        }

        let collections = Collections {
            flights: take_records(&mut object, EntityKind::Flights)?,
            budget: take_records(&mut object, EntityKind::Budget)?,
            itinerary: take_records(&mut object, EntityKind::Itinerary)?,
            checklist: take_records(&mut object, EntityKind::Checklist)?,
            documents: take_records(&mut object, EntityKind::Documents)?,
        };

        let export_date = object
            .remove("exportDate")
            .and_then(|value| serde_json::from_value::<DateTime<Utc>>(value).ok());

        debug!(
            version = %version,
            records = collections.total_records(),
            "Parsed snapshot"
        );

        Ok(Self {
            collections,
            export_date,
            version,
        })
    }

    /// Render the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn take_records<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    kind: EntityKind,
) -> Result<Vec<T>> {
    let value = object.remove(kind.as_str()).unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| Error::snapshot(format!("invalid record in `{kind}`: {e}")))
}

/// Read and validate a snapshot file.
///
/// # Errors
///
/// Returns [`Error::SnapshotRead`] if the file cannot be read, or
/// [`Error::SnapshotValidation`] if its contents are not a valid snapshot.
pub fn read_snapshot_file(path: &Path) -> Result<Snapshot> {
    let contents = fs::read_to_string(path).map_err(|source| Error::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;
    Snapshot::from_json(&contents)
}

/// Write a snapshot to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_snapshot_file(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, snapshot.to_json_pretty()?)?;
    debug!(path = %path.display(), "Wrote snapshot");
    Ok(())
}

/// File name used for an export taken on `date`.
#[must_use]
pub fn default_export_file_name(date: NaiveDate) -> String {
    format!("trip-planner-{}.json", date.format("%Y-%m-%d"))
}
