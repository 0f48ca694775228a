//! Expense ledger and derived-view engine.
//!
//! The engine keeps one user's expenses in memory and derives filtered lists,
//! summaries and category breakdowns from them:
//!
//! - [`ExpenseStore`] owns the records (add, replace by id, remove).
//! - [`matches`] decides whether a record passes a [`FilterCriteria`].
//! - [`ViewMaterializer`] builds and memoizes the filtered [`DerivedView`].
//! - [`summarize`] and [`category_distribution`] aggregate any record subset.
//! - [`FilterScheduler`] and [`RecomputeWorker`] defer and coalesce filter
//!   recomputation so that rapid edits stay cheap.
//!
//! [`Session`] ties them together and is what callers hold on to.
pub use aggregate::{CategoryDistribution, Summary, category_distribution, summarize};
pub use error::EngineError;
pub use expense::{Expense, ExpenseDraft, ExpenseId};
pub use filter::{CompiledFilter, DateRange, FilterCriteria, matches};
pub use money::MoneyCents;
pub use scheduler::{FilterScheduler, RecomputeTicket};
pub use session::Session;
pub use store::{ExpenseStore, Snapshot};
pub use view::{DerivedView, ViewKey, ViewMaterializer, filter_records};
pub use worker::{RecomputeRequest, RecomputeWorker};

mod aggregate;
mod error;
mod expense;
mod filter;
mod money;
mod scheduler;
mod session;
mod store;
mod view;
mod worker;

pub type ResultEngine<T> = Result<T, EngineError>;
