//! Summary figures derived from the current collections.
//!
//! Nothing here is stored. [`Dashboard::compute`] is a pure function of the
//! collections and the caller's notion of "today", so callers recompute it
//! after every change.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::model::{BudgetItem, ChecklistItem, Document, DocumentStatus, Flight, ItineraryItem};
use crate::transfer::Collections;

/// Count of finished documents against all documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentProgress {
    /// Documents with status done.
    pub done: usize,
    /// All documents.
    pub total: usize,
}

impl fmt::Display for DocumentProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

/// One entry of the next-tasks feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Task {
    /// An incomplete checklist item.
    Checklist {
        /// Item identifier.
        id: String,
        /// Item text.
        text: String,
    },
    /// An activity dated today or later.
    Activity {
        /// Activity identifier.
        id: String,
        /// Activity name.
        activity: String,
        /// Day of the activity.
        date: NaiveDate,
    },
    /// A document still pending.
    Document {
        /// Document identifier.
        id: String,
        /// Document type.
        kind: String,
    },
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checklist { text, .. } => write!(f, "[checklist] {text}"),
            Self::Activity { activity, date, .. } => {
                write!(f, "[activity] {activity} ({})", date.format("%d/%m/%Y"))
            }
            Self::Document { kind, .. } => write!(f, "[document] {kind}"),
        }
    }
}

/// Prioritized list of what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "tasks", rename_all = "snake_case")]
pub enum NextTasks {
    /// At least one task is outstanding.
    Pending(Vec<Task>),
    /// Nothing is outstanding.
    AllCaughtUp,
}

impl NextTasks {
    /// Outstanding tasks, empty when all caught up.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        match self {
            Self::Pending(tasks) => tasks,
            Self::AllCaughtUp => &[],
        }
    }
}

/// Derived trip summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Sum of all budget amounts.
    pub total_spend: f64,
    /// Rounded percentage of completed checklist items.
    pub checklist_progress: u8,
    /// Finished documents against all documents.
    pub documents: DocumentProgress,
    /// Number of itinerary activities.
    pub itinerary_count: usize,
    /// Number of flights.
    pub flight_count: usize,
    /// Sum of all flight prices.
    pub flight_spend: f64,
    /// What to do next.
    pub next_tasks: NextTasks,
}

impl Dashboard {
    /// Derive the dashboard from the collections as of `today`.
    #[must_use]
    pub fn compute(collections: &Collections, today: NaiveDate, limits: &DashboardConfig) -> Self {
        Self {
            total_spend: total_spend(&collections.budget),
            checklist_progress: checklist_progress(&collections.checklist),
            documents: document_progress(&collections.documents),
            itinerary_count: collections.itinerary.len(),
            flight_count: collections.flights.len(),
            flight_spend: flight_spend(&collections.flights),
            next_tasks: next_tasks(collections, today, limits),
        }
    }
}

/// Sum of all budget amounts; zero when there are none.
#[must_use]
pub fn total_spend(budget: &[BudgetItem]) -> f64 {
    budget.iter().map(|item| item.amount).sum()
}

/// Sum of all flight prices.
#[must_use]
pub fn flight_spend(flights: &[Flight]) -> f64 {
    flights.iter().map(|flight| flight.price).sum()
}

/// `round(100 * completed / total)`, or 0 for an empty checklist.
///
/// Halves round up, matching the usual display rounding.
#[must_use]
pub fn checklist_progress(checklist: &[ChecklistItem]) -> u8 {
    let total = checklist.len();
    if total == 0 {
        return 0;
    }
    let completed = checklist.iter().filter(|item| item.completed).count();
    let percent = (200 * completed + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}

/// Done documents over all documents.
#[must_use]
pub fn document_progress(documents: &[Document]) -> DocumentProgress {
    DocumentProgress {
        done: documents
            .iter()
            .filter(|doc| doc.status == DocumentStatus::Done)
            .count(),
        total: documents.len(),
    }
}

/// Build the next-tasks feed.
///
/// Incomplete checklist items come first in insertion order, then upcoming
/// activities (today or later) by ascending date, then pending documents.
/// Each source is capped by `limits`.
#[must_use]
pub fn next_tasks(
    collections: &Collections,
    today: NaiveDate,
    limits: &DashboardConfig,
) -> NextTasks {
    let mut tasks: Vec<Task> = collections
        .checklist
        .iter()
        .filter(|item| !item.completed)
        .take(limits.max_checklist_tasks)
        .map(|item| Task::Checklist {
            id: item.id.clone(),
            text: item.text.clone(),
        })
        .collect();

    let mut upcoming: Vec<&ItineraryItem> = collections
        .itinerary
        .iter()
        .filter(|item| item.date >= today)
        .collect();
    upcoming.sort_by_key(|item| item.date);
    tasks.extend(
        upcoming
            .into_iter()
            .take(limits.max_upcoming_activities)
            .map(|item| Task::Activity {
                id: item.id.clone(),
                activity: item.activity.clone(),
                date: item.date,
            }),
    );

    tasks.extend(
        collections
            .documents
            .iter()
            .filter(|doc| doc.status == DocumentStatus::Pending)
            .take(limits.max_pending_documents)
            .map(|doc| Task::Document {
                id: doc.id.clone(),
                kind: doc.kind.clone(),
            }),
    );

    if tasks.is_empty() {
        NextTasks::AllCaughtUp
    } else {
        NextTasks::Pending(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn checklist_item(id: &str, completed: bool) -> ChecklistItem {
        ChecklistItem {
            id: id.to_string(),
            text: format!("task {id}"),
            category: String::new(),
            completed,
            created: 0,
        }
    }

    fn activity(id: &str, on: NaiveDate) -> ItineraryItem {
        ItineraryItem {
            id: id.to_string(),
            date: on,
            activity: format!("activity {id}"),
            location: String::new(),
            time: String::new(),
            notes: String::new(),
            created: 0,
        }
    }

    fn document(id: &str, status: DocumentStatus) -> Document {
        Document {
            id: id.to_string(),
            kind: format!("doc {id}"),
            status,
            notes: String::new(),
            created: 0,
        }
    }

    fn budget_item(amount: f64) -> BudgetItem {
        BudgetItem {
            id: format!("b{amount}"),
            category: "misc".to_string(),
            amount,
            description: String::new(),
            created: 0,
        }
    }

    #[test]
    fn test_empty_collections() {
        let dashboard = Dashboard::compute(
            &Collections::default(),
            date(2025, 11, 1),
            &DashboardConfig::default(),
        );

        assert!(dashboard.total_spend.abs() < f64::EPSILON);
        assert_eq!(dashboard.checklist_progress, 0);
        assert_eq!(dashboard.documents.to_string(), "0/0");
        assert_eq!(dashboard.itinerary_count, 0);
        assert_eq!(dashboard.next_tasks, NextTasks::AllCaughtUp);
        assert!(dashboard.next_tasks.tasks().is_empty());
    }

    #[test]
    fn test_total_spend() {
        let budget = vec![budget_item(100.25), budget_item(49.75), budget_item(0.0)];
        assert!((total_spend(&budget) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_checklist_progress_rounding() {
        let one_of_three = vec![
            checklist_item("a", true),
            checklist_item("b", false),
            checklist_item("c", false),
        ];
        assert_eq!(checklist_progress(&one_of_three), 33);

        let two_of_three = vec![
            checklist_item("a", true),
            checklist_item("b", true),
            checklist_item("c", false),
        ];
        assert_eq!(checklist_progress(&two_of_three), 67);

        let one_of_eight: Vec<ChecklistItem> = (0..8)
            .map(|i| checklist_item(&i.to_string(), i == 0))
            .collect();
        // 12.5 rounds up
        assert_eq!(checklist_progress(&one_of_eight), 13);

        let all_done = vec![checklist_item("a", true)];
        assert_eq!(checklist_progress(&all_done), 100);
    }

    #[test]
    fn test_document_progress() {
        let documents = vec![
            document("a", DocumentStatus::Done),
            document("b", DocumentStatus::InProgress),
            document("c", DocumentStatus::Pending),
        ];
        let progress = document_progress(&documents);
        assert_eq!(progress, DocumentProgress { done: 1, total: 3 });
        assert_eq!(progress.to_string(), "1/3");
    }

    #[test]
    fn test_next_tasks_order_and_caps() {
        let today = date(2025, 11, 10);
        let collections = Collections {
            checklist: vec![
                checklist_item("c1", false),
                checklist_item("c2", true),
                checklist_item("c3", false),
                checklist_item("c4", false),
                checklist_item("c5", false),
            ],
            itinerary: vec![
                activity("late", date(2025, 11, 30)),
                activity("past", date(2025, 11, 9)),
                activity("today", today),
                activity("soon", date(2025, 11, 12)),
            ],
            documents: vec![
                document("d1", DocumentStatus::InProgress),
                document("d2", DocumentStatus::Pending),
                document("d3", DocumentStatus::Pending),
                document("d4", DocumentStatus::Pending),
            ],
            ..Collections::default()
        };

        let feed = next_tasks(&collections, today, &DashboardConfig::default());
        let ids: Vec<&str> = feed
            .tasks()
            .iter()
            .map(|task| match task {
                Task::Checklist { id, .. }
                | Task::Activity { id, .. }
                | Task::Document { id, .. } => id.as_str(),
            })
            .collect();

        assert_eq!(ids, vec!["c1", "c3", "c4", "today", "soon", "d2", "d3"]);
    }

    #[test]
    fn test_next_tasks_past_activities_only_is_caught_up() {
        let collections = Collections {
            checklist: vec![checklist_item("c1", true)],
            itinerary: vec![activity("past", date(2024, 1, 1))],
            documents: vec![document("d1", DocumentStatus::Done)],
            ..Collections::default()
        };

        let feed = next_tasks(&collections, date(2025, 1, 1), &DashboardConfig::default());
        assert_eq!(feed, NextTasks::AllCaughtUp);
    }

    #[test]
    fn test_custom_limits() {
        let collections = Collections {
            checklist: vec![checklist_item("c1", false), checklist_item("c2", false)],
            ..Collections::default()
        };
        let limits = DashboardConfig {
            max_checklist_tasks: 1,
            ..DashboardConfig::default()
        };

        let feed = next_tasks(&collections, date(2025, 1, 1), &limits);
        assert_eq!(feed.tasks().len(), 1);
    }

    #[test]
    fn test_task_display() {
        let task = Task::Activity {
            id: "a".to_string(),
            activity: "Boccadasse walk".to_string(),
            date: date(2025, 12, 3),
        };
        assert_eq!(task.to_string(), "[activity] Boccadasse walk (03/12/2025)");

        let task = Task::Document {
            id: "d".to_string(),
            kind: "Visa".to_string(),
        };
        assert_eq!(task.to_string(), "[document] Visa");
    }

    #[test]
    fn test_dashboard_flight_figures() {
        let collections = Collections {
            flights: vec![Flight {
                id: "f1".to_string(),
                origin: "GRU".to_string(),
                destination: "FCO".to_string(),
                date: date(2025, 11, 20),
                price: 1200.5,
                airline: "TAP".to_string(),
                created: 0,
            }],
            budget: vec![budget_item(10.0)],
            ..Collections::default()
        };

        let dashboard =
            Dashboard::compute(&collections, date(2025, 11, 1), &DashboardConfig::default());
        assert_eq!(dashboard.flight_count, 1);
        assert!((dashboard.flight_spend - 1200.5).abs() < f64::EPSILON);
        assert!((dashboard.total_spend - 10.0).abs() < f64::EPSILON);
    }
}
