//! `tripplanner` - Local-first personal trip planner
//!
//! This library keeps five record collections (flights, budget items,
//! itinerary activities, checklist items and travel documents) in a
//! key-value store, derives a dashboard from them, counts down to departure
//! and moves the whole plan in and out of JSON snapshots.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod model;
pub mod planner;
pub mod storage;
pub mod store;
pub mod transfer;

pub use config::Config;
pub use countdown::days_until;
pub use dashboard::{Dashboard, NextTasks, Task};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use planner::TripPlanner;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, Storage, StorageStats};
pub use store::EntityStore;
pub use transfer::{Collections, Snapshot};
