use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{EntityId, EntityKind, Record};
use crate::error::{Error, Result};

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):([0-5]\d)$").expect("valid time regex"));

/// Normalize a start time to zero-padded `HH:MM`.
///
/// Blank input means unscheduled and yields an empty string, so that
/// `9:05` and `09:05` sort the same way within a day.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless the input is `H:MM` or `HH:MM`
/// with an hour of at most 23.
pub fn normalize_time(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(String::new());
    }
    TIME_PATTERN
        .captures(input)
        .and_then(|caps| {
            let hour: u8 = caps[1].parse().ok()?;
            (hour <= 23).then(|| format!("{hour:02}:{}", &caps[2]))
        })
        .ok_or_else(|| Error::invalid_input("time", format!("`{input}` is not a HH:MM time")))
}

/// A planned activity on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Identifier assigned on creation.
    pub id: EntityId,
    /// Day of the activity.
    pub date: NaiveDate,
    /// What is planned.
    pub activity: String,
    /// Where it happens.
    #[serde(default)]
    pub location: String,
    /// Start time as `HH:MM`, empty when unscheduled.
    #[serde(default)]
    pub time: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Creation time in Unix milliseconds.
    pub created: i64,
}

/// Input for creating an [`ItineraryItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewItineraryItem {
    /// Day of the activity.
    pub date: NaiveDate,
    /// What is planned.
    pub activity: String,
    /// Where it happens.
    pub location: String,
    /// Start time as `HH:MM`, see [`normalize_time`].
    pub time: String,
    /// Free-form notes.
    pub notes: String,
}

/// Partial update for an [`ItineraryItem`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryPatch {
    /// New date.
    pub date: Option<NaiveDate>,
    /// New activity.
    pub activity: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New start time.
    pub time: Option<String>,
    /// New notes.
    pub notes: Option<String>,
}

impl Record for ItineraryItem {
    type Draft = NewItineraryItem;
    type Patch = ItineraryPatch;

    const KIND: EntityKind = EntityKind::Itinerary;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, created: i64, draft: NewItineraryItem) -> Self {
        Self {
            id,
            date: draft.date,
            activity: draft.activity,
            location: draft.location,
            time: draft.time,
            notes: draft.notes,
            created,
        }
    }

    fn apply_patch(&mut self, patch: ItineraryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(activity) = patch.activity {
            self.activity = activity;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}
