//! Generic CRUD store for one record collection.
//!
//! Every operation is a full read-modify-write round trip through
//! [`Storage`]: load the whole collection, change it in memory, write the
//! whole collection back. Missing identifiers are not errors; `update` and
//! `toggle_completion` report them as `None` and `delete` leaves the
//! collection untouched.

use std::marker::PhantomData;

use tracing::{debug, info};

use crate::error::Result;
use crate::model::{new_entity_id, now_millis, ChecklistItem, ItineraryItem, Record};
use crate::storage::Storage;

/// CRUD access to the collection of one record kind.
#[derive(Debug, Clone)]
pub struct EntityStore<R: Record> {
    storage: Storage,
    key: String,
    _record: PhantomData<R>,
}

impl<R: Record> EntityStore<R> {
    /// Create a store for `R` under the storage key derived from `key_prefix`.
    #[must_use]
    pub fn new(storage: Storage, key_prefix: &str) -> Self {
        Self {
            storage,
            key: R::KIND.storage_key(key_prefix),
            _record: PhantomData,
        }
    }

    /// The storage key this collection lives under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Create a record from `draft`, append it and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn create(&self, draft: R::Draft) -> Result<R> {
        let mut records = self.list();
        let record = R::from_draft(new_entity_id(), now_millis(), draft);
        records.push(record.clone());
        self.storage.save(&self.key, &records)?;

        info!("Created {} record {}", R::KIND, record.id());
        Ok(record)
    }

    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<R> {
        self.storage.load(&self.key)
    }

    /// Look up one record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<R> {
        self.list().into_iter().find(|record| record.id() == id)
    }

    /// Merge `patch` over the record with identifier `id` and persist.
    ///
    /// Returns `None` without writing when no record has that identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn update(&self, id: &str, patch: R::Patch) -> Result<Option<R>> {
        self.modify(id, |record| record.apply_patch(patch))
    }

    /// Remove the record with identifier `id` and return what remains.
    ///
    /// Removing an unknown identifier changes nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn delete(&self, id: &str) -> Result<Vec<R>> {
        let mut records = self.list();
        let before = records.len();
        records.retain(|record| record.id() != id);

        if records.len() == before {
            debug!("No {} record {} to delete", R::KIND, id);
            return Ok(records);
        }

        self.storage.save(&self.key, &records)?;
        info!("Deleted {} record {}", R::KIND, id);
        Ok(records)
    }

    /// Overwrite the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn replace_all(&self, records: &[R]) -> Result<()> {
        self.storage.save(&self.key, records)?;
        debug!("Replaced {} with {} records", self.key, records.len());
        Ok(())
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut R)) -> Result<Option<R>> {
        let mut records = self.list();
        let Some(record) = records.iter_mut().find(|record| record.id() == id) else {
            debug!("No {} record {} to modify", R::KIND, id);
            return Ok(None);
        };

        change(record);
        let updated = record.clone();
        self.storage.save(&self.key, &records)?;

        info!("Updated {} record {}", R::KIND, id);
        Ok(Some(updated))
    }
}

impl EntityStore<ChecklistItem> {
    /// Flip the completion flag of one checklist item.
    ///
    /// Returns `None` without writing when no item has that identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub fn toggle_completion(&self, id: &str) -> Result<Option<ChecklistItem>> {
        self.modify(id, ChecklistItem::toggle)
    }

    /// Items grouped by category, categories in first-seen order.
    #[must_use]
    pub fn list_by_category(&self) -> Vec<(String, Vec<ChecklistItem>)> {
        group_in_order(self.list(), |item| item.category.clone())
    }
}

impl EntityStore<ItineraryItem> {
    /// Activities sorted by date, then start time; ties keep insertion order.
    #[must_use]
    pub fn list_by_date(&self) -> Vec<ItineraryItem> {
        let mut items = self.list();
        items.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        items
    }
}

/// Group `items` by `key`, keeping groups in first-seen order.
fn group_in_order<T, K: PartialEq>(items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<(K, Vec<T>)> {
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}
