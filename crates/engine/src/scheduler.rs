//! Deferred, coalescing commit of filter criteria.
//!
//! Edits land in a latest-value register and are echoed immediately. The
//! criteria that derived views are computed from lag behind: a recompute
//! takes a [`RecomputeTicket`] for the newest edit and only commits if no
//! further edit arrived meanwhile. A burst of edits therefore ends in one
//! commit of the final value.
use crate::FilterCriteria;

/// Permission to recompute against one specific criteria generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecomputeTicket {
    pub generation: u64,
    pub criteria: FilterCriteria,
}

#[derive(Debug, Default)]
pub struct FilterScheduler {
    latest: FilterCriteria,
    generation: u64,
    committed: FilterCriteria,
    committed_generation: u64,
}

impl FilterScheduler {
    pub fn new(initial: FilterCriteria) -> Self {
        Self {
            latest: initial.clone(),
            generation: 0,
            committed: initial,
            committed_generation: 0,
        }
    }

    /// Accepts an edit. Any recompute started for an older edit is now stale.
    pub fn submit(&mut self, criteria: FilterCriteria) -> u64 {
        self.latest = criteria;
        self.generation += 1;
        tracing::trace!(generation = self.generation, "filter edit submitted");
        self.generation
    }

    /// The most recent edit, for echoing back to the filter inputs.
    pub fn latest(&self) -> &FilterCriteria {
        &self.latest
    }

    /// The criteria derived views are currently built from.
    pub fn committed(&self) -> &FilterCriteria {
        &self.committed
    }

    pub fn committed_generation(&self) -> u64 {
        self.committed_generation
    }

    /// `true` while the committed criteria lag behind the latest edit.
    pub fn is_pending(&self) -> bool {
        self.committed_generation != self.generation
    }

    /// Hands out a ticket for the newest edit, or `None` if nothing is pending.
    pub fn begin(&self) -> Option<RecomputeTicket> {
        self.is_pending().then(|| RecomputeTicket {
            generation: self.generation,
            criteria: self.latest.clone(),
        })
    }

    /// Commits the ticket's criteria unless a newer edit superseded it.
    ///
    /// Returns `false` when the result computed under the ticket must be dropped.
    pub fn commit(&mut self, ticket: &RecomputeTicket) -> bool {
        if ticket.generation != self.generation || ticket.generation <= self.committed_generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded recompute"
            );
            return false;
        }
        self.committed = ticket.criteria.clone();
        self.committed_generation = ticket.generation;
        true
    }
}
