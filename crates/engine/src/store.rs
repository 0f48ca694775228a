//! The authoritative expense collection.
//!
//! Records keep insertion order for stable iteration. Every mutation bumps a
//! version counter that derived views use as part of their cache key.
use std::sync::Arc;

use crate::{EngineError, Expense, ExpenseDraft, ExpenseId, ResultEngine};

/// Immutable view of the store contents at one version.
///
/// Cloning is cheap; mutations after the snapshot was taken are never
/// observed through it.
pub type Snapshot = Arc<Vec<Expense>>;

#[derive(Debug, Default)]
pub struct ExpenseStore {
    records: Snapshot,
    next_id: u64,
    version: u64,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new record and returns its freshly assigned id.
    ///
    /// Ids are monotonic and never reused, not even after a delete.
    pub fn add(&mut self, draft: ExpenseDraft) -> ExpenseId {
        self.next_id += 1;
        let id = ExpenseId::new(self.next_id);
        Arc::make_mut(&mut self.records).push(draft.with_id(id));
        self.bump();
        tracing::debug!(%id, version = self.version, "expense added");
        id
    }

    /// Replaces every field of an existing record, keeping its id and position.
    pub fn replace(&mut self, id: ExpenseId, draft: ExpenseDraft) -> ResultEngine<()> {
        let Some(index) = self.position(id) else {
            tracing::warn!(%id, "replace on unknown expense");
            return Err(EngineError::NotFound(id));
        };
        Arc::make_mut(&mut self.records)[index] = draft.with_id(id);
        self.bump();
        tracing::debug!(%id, version = self.version, "expense replaced");
        Ok(())
    }

    /// Removes a record, returning it.
    pub fn remove(&mut self, id: ExpenseId) -> ResultEngine<Expense> {
        let Some(index) = self.position(id) else {
            tracing::warn!(%id, "remove on unknown expense");
            return Err(EngineError::NotFound(id));
        };
        let removed = Arc::make_mut(&mut self.records).remove(index);
        self.bump();
        tracing::debug!(%id, version = self.version, "expense removed");
        Ok(removed)
    }

    /// All records in insertion order.
    pub fn all(&self) -> Snapshot {
        Arc::clone(&self.records)
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.records.iter().find(|expense| expense.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Counter incremented on every successful add/replace/remove.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn position(&self, id: ExpenseId) -> Option<usize> {
        self.records.iter().position(|expense| expense.id == id)
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}
