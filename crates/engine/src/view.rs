//! Filtered view materialization.
//!
//! A [`DerivedView`] is the filtered record subset plus its [`Summary`] for one
//! `(store version, criteria)` pair. [`ViewMaterializer`] keeps the last one and
//! only recomputes when either half of that key moves.
use std::sync::Arc;

use serde::Serialize;

use crate::{CompiledFilter, Expense, FilterCriteria, Summary, summarize};

/// Cache key of a derived view.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub store_version: u64,
    pub criteria: FilterCriteria,
}

impl ViewKey {
    fn is(&self, store_version: u64, criteria: &FilterCriteria) -> bool {
        self.store_version == store_version && &self.criteria == criteria
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    /// Scheduler generation the criteria were committed under.
    pub generation: u64,
    pub store_version: u64,
    pub criteria: FilterCriteria,
    /// Matching records in store order.
    pub expenses: Vec<Expense>,
    pub summary: Summary,
}

impl DerivedView {
    /// Full pass over `records`: filter, then summarize the survivors.
    pub fn compute(
        records: &[Expense],
        store_version: u64,
        generation: u64,
        criteria: &FilterCriteria,
    ) -> Self {
        let expenses = filter_records(records, criteria);
        let summary = summarize(&expenses);
        Self {
            generation,
            store_version,
            criteria: criteria.clone(),
            expenses,
            summary,
        }
    }

    pub fn key(&self) -> ViewKey {
        ViewKey {
            store_version: self.store_version,
            criteria: self.criteria.clone(),
        }
    }
}

/// The subsequence of `records` matching `criteria`, preserving order.
pub fn filter_records(records: &[Expense], criteria: &FilterCriteria) -> Vec<Expense> {
    let filter = CompiledFilter::new(criteria);
    records
        .iter()
        .filter(|expense| filter.matches(expense))
        .cloned()
        .collect()
}

/// Single-slot memo of the most recent [`DerivedView`].
#[derive(Debug, Default)]
pub struct ViewMaterializer {
    cached: Option<(ViewKey, Arc<DerivedView>)>,
    recomputations: u64,
}

impl ViewMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view for `(store_version, criteria)`, recomputing on a miss.
    pub fn view(
        &mut self,
        records: &[Expense],
        store_version: u64,
        generation: u64,
        criteria: &FilterCriteria,
    ) -> Arc<DerivedView> {
        if let Some((key, cached)) = &self.cached
            && key.is(store_version, criteria)
        {
            tracing::trace!(store_version, "view cache hit");
            return Arc::clone(cached);
        }

        tracing::trace!(store_version, generation, "view cache miss");
        let view = Arc::new(DerivedView::compute(
            records,
            store_version,
            generation,
            criteria,
        ));
        self.recomputations += 1;
        self.install(Arc::clone(&view));
        view
    }

    /// Adopts a view computed elsewhere (e.g. by the background worker).
    pub fn install(&mut self, view: Arc<DerivedView>) {
        self.cached = Some((view.key(), view));
    }

    /// Number of full passes this materializer has run.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
