use serde::{Deserialize, Serialize};

use super::{coerce_amount, finite_or_zero, EntityId, EntityKind, Record};

/// One expense line in the trip budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    /// Identifier assigned on creation.
    pub id: EntityId,
    /// Spending category, e.g. lodging or food.
    pub category: String,
    /// Amount spent or planned.
    pub amount: f64,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Creation time in Unix milliseconds.
    pub created: i64,
}

/// Input for creating a [`BudgetItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetItem {
    /// Spending category.
    pub category: String,
    /// Amount as entered; unparsable input becomes 0.
    pub amount: String,
    /// Free-form description.
    pub description: String,
}

/// Partial update for a [`BudgetItem`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetPatch {
    /// New category.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<f64>,
    /// New description.
    pub description: Option<String>,
}

impl Record for BudgetItem {
    type Draft = NewBudgetItem;
    type Patch = BudgetPatch;

    const KIND: EntityKind = EntityKind::Budget;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, created: i64, draft: NewBudgetItem) -> Self {
        Self {
            id,
            category: draft.category,
            amount: coerce_amount(&draft.amount),
            description: draft.description,
            created,
        }
    }

    fn apply_patch(&mut self, patch: BudgetPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount) = patch.amount {
            self.amount = finite_or_zero(amount);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}
