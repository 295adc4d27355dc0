use serde::{Deserialize, Serialize};

use super::{EntityId, EntityKind, Record};

/// A to-do item for trip preparation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Identifier assigned on creation.
    pub id: EntityId,
    /// What needs doing.
    pub text: String,
    /// Grouping such as packing or bookings.
    #[serde(default)]
    pub category: String,
    /// Whether the item is done.
    #[serde(default)]
    pub completed: bool,
    /// Creation time in Unix milliseconds.
    pub created: i64,
}

/// Input for creating a [`ChecklistItem`]; new items start incomplete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChecklistItem {
    /// What needs doing.
    pub text: String,
    /// Grouping.
    pub category: String,
}

/// Partial update for a [`ChecklistItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistPatch {
    /// New text.
    pub text: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
}

impl ChecklistItem {
    /// Flip the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

impl Record for ChecklistItem {
    type Draft = NewChecklistItem;
    type Patch = ChecklistPatch;

    const KIND: EntityKind = EntityKind::Checklist;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, created: i64, draft: NewChecklistItem) -> Self {
        Self {
            id,
            text: draft.text,
            category: draft.category,
            completed: false,
            created,
        }
    }

    fn apply_patch(&mut self, patch: ChecklistPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_starts_incomplete() {
        let item = ChecklistItem::from_draft(
            "c1".to_string(),
            1,
            NewChecklistItem {
                text: "Buy travel adapter".to_string(),
                category: "packing".to_string(),
            },
        );
        assert!(!item.completed);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut item: ChecklistItem =
            serde_json::from_str(r#"{"id":"c1","text":"Passport","created":1}"#).unwrap();
        assert!(!item.completed);
        assert!(item.category.is_empty());

        item.toggle();
        assert!(item.completed);
        item.toggle();
        assert!(!item.completed);
    }
}
