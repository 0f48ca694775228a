//! The session: one user's ledger plus its filter state.
//!
//! `Session` is the only owner of the [`ExpenseStore`] and of the filter
//! criteria. Store mutations apply synchronously; filter edits are echoed at
//! once and committed later through the [`FilterScheduler`], either inline via
//! [`Session::run_pending`] or by a [`RecomputeWorker`] whose results come back
//! through [`Session::apply`].
//!
//! [`RecomputeWorker`]: crate::RecomputeWorker
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    CategoryDistribution, DerivedView, Expense, ExpenseDraft, ExpenseId, ExpenseStore,
    FilterCriteria, FilterScheduler, MoneyCents, RecomputeRequest, RecomputeTicket, ResultEngine,
    Snapshot, Summary, ViewMaterializer, category_distribution,
};

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    store: ExpenseStore,
    scheduler: FilterScheduler,
    materializer: ViewMaterializer,
    distribution: Option<(u64, Arc<CategoryDistribution>)>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "session opened");
        Self {
            id,
            store: ExpenseStore::new(),
            scheduler: FilterScheduler::new(FilterCriteria::cleared()),
            materializer: ViewMaterializer::new(),
            distribution: None,
        }
    }

    /// A session preloaded with the demo expenses.
    pub fn sample() -> Self {
        let mut session = Self::new();
        for draft in sample_drafts() {
            session.add(draft);
        }
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn add(&mut self, draft: ExpenseDraft) -> ExpenseId {
        self.store.add(draft)
    }

    pub fn replace(&mut self, id: ExpenseId, draft: ExpenseDraft) -> ResultEngine<()> {
        self.store.replace(id, draft)
    }

    pub fn remove(&mut self, id: ExpenseId) -> ResultEngine<Expense> {
        self.store.remove(id)
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.store.get(id)
    }

    pub fn all(&self) -> Snapshot {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Accepts a filter edit; it shows up in [`Session::filter`] immediately.
    pub fn set_filter(&mut self, criteria: FilterCriteria) -> u64 {
        self.scheduler.submit(criteria)
    }

    /// The latest filter edit (the echo).
    pub fn filter(&self) -> &FilterCriteria {
        self.scheduler.latest()
    }

    /// The criteria the current derived views are built from.
    pub fn committed_filter(&self) -> &FilterCriteria {
        self.scheduler.committed()
    }

    /// `true` while a filter edit has not reached the derived views yet.
    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Runs the outstanding recompute inline, if any.
    ///
    /// Returns `true` when newer criteria were committed.
    pub fn run_pending(&mut self) -> bool {
        let Some(ticket) = self.scheduler.begin() else {
            return false;
        };
        let records = self.store.all();
        self.materializer.view(
            &records,
            self.store.version(),
            ticket.generation,
            &ticket.criteria,
        );
        self.scheduler.commit(&ticket)
    }

    /// Packs the outstanding recompute for a background worker.
    pub fn recompute_request(&self) -> Option<RecomputeRequest> {
        self.scheduler.begin().map(|ticket| RecomputeRequest {
            ticket,
            records: self.store.all(),
            store_version: self.store.version(),
        })
    }

    /// Adopts a view computed by a worker.
    ///
    /// The view is dropped (returning `false`) if the store changed or a newer
    /// filter edit arrived after the request was made.
    pub fn apply(&mut self, view: Arc<DerivedView>) -> bool {
        if view.store_version != self.store.version() {
            tracing::debug!(
                session = %self.id,
                stale = view.store_version,
                current = self.store.version(),
                "dropping view built from an old store version"
            );
            return false;
        }
        let ticket = RecomputeTicket {
            generation: view.generation,
            criteria: view.criteria.clone(),
        };
        if !self.scheduler.commit(&ticket) {
            return false;
        }
        self.materializer.install(view);
        true
    }

    /// Filtered records and their summary under the committed criteria.
    pub fn view(&mut self) -> Arc<DerivedView> {
        let records = self.store.all();
        self.materializer.view(
            &records,
            self.store.version(),
            self.scheduler.committed_generation(),
            self.scheduler.committed(),
        )
    }

    pub fn filtered(&mut self) -> Vec<Expense> {
        self.view().expenses.clone()
    }

    pub fn summary(&mut self) -> Summary {
        self.view().summary.clone()
    }

    /// Totals per category over every record, ignoring the filter.
    pub fn distribution(&mut self) -> Arc<CategoryDistribution> {
        let version = self.store.version();
        if let Some((cached_version, distribution)) = &self.distribution
            && *cached_version == version
        {
            return Arc::clone(distribution);
        }
        let distribution = Arc::new(category_distribution(self.store.all().iter()));
        self.distribution = Some((version, Arc::clone(&distribution)));
        distribution
    }

    /// Distinct categories in the store, in first-seen order.
    pub fn categories(&mut self) -> Vec<String> {
        self.distribution()
            .iter()
            .map(|(category, _)| category.to_string())
            .collect()
    }

    /// Distinct categories sorted for a picker.
    pub fn category_options(&mut self) -> Vec<String> {
        let mut options = self.categories();
        options.sort();
        options
    }

    /// Number of full filter passes run by the inline materializer.
    pub fn recomputations(&self) -> u64 {
        self.materializer.recomputations()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::debug!(session = %self.id, records = self.store.len(), "session closed");
    }
}

fn sample_drafts() -> Vec<ExpenseDraft> {
    [
        ("Groceries", 125_65, (2025, 4, 10), "Food"),
        ("Electricity Bill", 85_43, (2025, 4, 5), "Utilities"),
        ("Movie Tickets", 48_50, (2025, 4, 8), "Entertainment"),
        ("Fuel", 60_00, (2025, 4, 12), "Transportation"),
    ]
    .into_iter()
    .filter_map(|(description, cents, (y, m, d), category)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .map(|date| ExpenseDraft::new(description, MoneyCents::new(cents), date, category))
    })
    .collect()
}
