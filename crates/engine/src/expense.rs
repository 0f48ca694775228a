//! The module contains the `Expense` record and its id-less `ExpenseDraft`.
//!
//! A draft is what the input boundary submits; the store turns it into an
//! `Expense` by assigning a fresh `ExpenseId`.
use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Opaque expense identifier, unique for the lifetime of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub category: String,
}

impl Expense {
    /// Returns the record fields without the id.
    pub fn draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            amount: self.amount,
            date: self.date,
            category: self.category.clone(),
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} [{}]",
            self.id, self.date, self.amount, self.description, self.category
        )
    }
}

/// Expense fields as submitted by the input boundary, before an id exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: MoneyCents,
    pub date: NaiveDate,
    pub category: String,
}

impl ExpenseDraft {
    pub fn new(
        description: impl Into<String>,
        amount: MoneyCents,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            date,
            category: category.into(),
        }
    }

    /// Form-level checks the input boundary runs before submitting.
    ///
    /// The store itself never calls this: it accepts any well-typed draft.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.description.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "description is required".to_string(),
            ));
        }
        if !self.amount.is_positive() {
            return Err(EngineError::InvalidInput(
                "amount must be greater than zero".to_string(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(EngineError::InvalidInput("category is required".to_string()));
        }
        Ok(())
    }

    /// Attaches an id, producing a full record.
    pub fn with_id(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            description: self.description,
            amount: self.amount,
            date: self.date,
            category: self.category,
        }
    }
}
