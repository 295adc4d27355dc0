use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{coerce_amount, non_negative, EntityId, EntityKind, Record};

/// A flight leg of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Identifier assigned on creation.
    pub id: EntityId,
    /// Departure airport or city.
    pub origin: String,
    /// Arrival airport or city.
    pub destination: String,
    /// Departure date.
    pub date: NaiveDate,
    /// Ticket price, never negative.
    pub price: f64,
    /// Operating airline.
    #[serde(default)]
    pub airline: String,
    /// Creation time in Unix milliseconds.
    pub created: i64,
}

/// Input for creating a [`Flight`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewFlight {
    /// Departure airport or city.
    pub origin: String,
    /// Arrival airport or city.
    pub destination: String,
    /// Departure date.
    pub date: NaiveDate,
    /// Price as entered; unparsable or negative input becomes 0.
    pub price: String,
    /// Operating airline.
    pub airline: String,
}

/// Partial update for a [`Flight`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightPatch {
    /// New origin.
    pub origin: Option<String>,
    /// New destination.
    pub destination: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New price; negative values are stored as 0.
    pub price: Option<f64>,
    /// New airline.
    pub airline: Option<String>,
}

impl Record for Flight {
    type Draft = NewFlight;
    type Patch = FlightPatch;

    const KIND: EntityKind = EntityKind::Flights;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, created: i64, draft: NewFlight) -> Self {
        Self {
            id,
            origin: draft.origin,
            destination: draft.destination,
            date: draft.date,
            price: non_negative(coerce_amount(&draft.price)),
            airline: draft.airline,
            created,
        }
    }

    fn apply_patch(&mut self, patch: FlightPatch) {
        if let Some(origin) = patch.origin {
            self.origin = origin;
        }
        if let Some(destination) = patch.destination {
            self.destination = destination;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(price) = patch.price {
            self.price = non_negative(price);
        }
        if let Some(airline) = patch.airline {
            self.airline = airline;
        }
    }
}
