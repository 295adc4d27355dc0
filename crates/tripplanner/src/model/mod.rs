//! Domain records for the trip planner.
//!
//! Five record kinds share one shape: an opaque string identifier, a
//! `created` timestamp in Unix milliseconds and kind-specific fields.
//! [`Record`] captures that shape so one generic store can manage all of
//! them, with per-kind coercion living in `from_draft` and `apply_patch`.
//!
//! Drafts carry the raw user input needed to create a record. Patches carry
//! `Option` fields: `None` keeps the stored value, `Some` overwrites it
//! (including `Some(String::new())`, which clears a text field).

mod budget;
mod checklist;
mod document;
mod flight;
mod itinerary;

use std::fmt;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub use budget::{BudgetItem, BudgetPatch, NewBudgetItem};
pub use checklist::{ChecklistItem, ChecklistPatch, NewChecklistItem};
pub use document::{Document, DocumentPatch, DocumentStatus, NewDocument};
pub use flight::{Flight, FlightPatch, NewFlight};
pub use itinerary::{normalize_time, ItineraryItem, ItineraryPatch, NewItineraryItem};

/// Identifier of a record within its collection.
///
/// Kept as a plain string so identifiers from imported snapshots survive
/// verbatim whatever format produced them.
pub type EntityId = String;

/// Leading decimal literal accepted by [`coerce_amount`].
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid numeric regex")
});

/// The five persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Flights booked or considered.
    Flights,
    /// Budget line items.
    Budget,
    /// Itinerary activities.
    Itinerary,
    /// Checklist tasks.
    Checklist,
    /// Travel documents.
    Documents,
}

impl EntityKind {
    /// All kinds in snapshot order.
    pub const ALL: [Self; 5] = [
        Self::Flights,
        Self::Budget,
        Self::Itinerary,
        Self::Checklist,
        Self::Documents,
    ];

    /// Stable name used in storage keys and snapshot fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Budget => "budget",
            Self::Itinerary => "itinerary",
            Self::Checklist => "checklist",
            Self::Documents => "documents",
        }
    }

    /// Key under which this collection is stored for the given prefix.
    #[must_use]
    pub fn storage_key(self, prefix: &str) -> String {
        format!("{prefix}_{}", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that can live in an [`EntityStore`](crate::store::EntityStore).
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug {
    /// Input needed to create a record.
    type Draft;
    /// Partial update applied over an existing record.
    type Patch;

    /// Which collection this record belongs to.
    const KIND: EntityKind;

    /// The record's identifier.
    fn id(&self) -> &str;

    /// Build a record from a draft, coercing raw input as needed.
    fn from_draft(id: EntityId, created: i64, draft: Self::Draft) -> Self;

    /// Merge the fields set in `patch` over this record.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Generate a fresh identifier.
///
/// UUID v7 keeps identifiers roughly ordered by creation time while staying
/// unique across sessions.
#[must_use]
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7().to_string()
}

/// Current time in Unix milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Interpret user-entered money text as a number.
///
/// Parses the longest leading decimal literal after trimming, so `"12.50 EUR"`
/// reads as `12.5`. Input with no leading literal, or one that overflows to a
/// non-finite value, reads as `0.0`.
#[must_use]
pub fn coerce_amount(input: &str) -> f64 {
    NUMERIC_PREFIX
        .find(input.trim())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Clamp a price to a finite, non-negative value.
#[must_use]
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Replace non-finite amounts with zero.
#[must_use]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
