//! The module contains the errors the engine can report.
//!
//! The errors are:
//!
//! - [`NotFound`] returned when a replace/remove targets an unknown expense.
//! - [`InvalidInput`] returned by the input-boundary validation helpers.
//! - [`InvalidAmount`] returned when a money amount can not be parsed.
//! - [`SchedulerClosed`] returned when the background recompute worker is gone.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`SchedulerClosed`]: EngineError::SchedulerClosed
use thiserror::Error;

use crate::ExpenseId;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("expense \"{0}\" not found!")]
    NotFound(ExpenseId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("recompute worker has shut down")]
    SchedulerClosed,
}
