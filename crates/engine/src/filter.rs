//! Filter criteria and the membership predicate.
//!
//! Criteria hold the raw values the filter inputs echo back (date bounds are
//! kept as typed). [`matches`] evaluates them against one record; the view
//! materializer compiles them once per pass through [`CompiledFilter`].
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, Expense, ResultEngine};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive date range; an empty bound leaves the range unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// The `(text, category, date range)` tuple that selects the filtered view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive description fragment; empty matches everything.
    pub text: String,
    /// Exact category; empty matches everything.
    pub category: String,
    pub date_range: DateRange,
}

impl FilterCriteria {
    /// Criteria that match every record.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.date_range.start = start.into();
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.date_range.end = end.into();
        self
    }

    pub fn is_cleared(&self) -> bool {
        self.text.is_empty()
            && self.category.is_empty()
            && self.date_range.start.is_empty()
            && self.date_range.end.is_empty()
    }

    /// Input-boundary check on the date range.
    ///
    /// Evaluation never fails; this only lets the filter UI flag bad bounds.
    pub fn validate(&self) -> ResultEngine<()> {
        let start = parse_bound(&self.date_range.start, "start")?;
        let end = parse_bound(&self.date_range.end, "end")?;
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            return Err(EngineError::InvalidInput(format!(
                "invalid range: end {end} is before start {start}"
            )));
        }
        Ok(())
    }
}

/// Only the empty string is an absent bound; anything else must parse.
fn parse_bound(raw: &str, label: &str) -> ResultEngine<Option<NaiveDate>> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_date(raw)
        .map(Some)
        .ok_or_else(|| EngineError::InvalidInput(format!("invalid {label} date: {raw:?}")))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Canonical form used for case-insensitive substring search.
fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateClause {
    Any,
    Within(NaiveDate, NaiveDate),
    /// Both bounds given but at least one is not a date.
    Never,
}

/// Criteria prepared for repeated evaluation.
#[derive(Clone, Debug)]
pub struct CompiledFilter {
    text: String,
    category: String,
    date: DateClause,
}

impl CompiledFilter {
    pub fn new(criteria: &FilterCriteria) -> Self {
        let DateRange { start, end } = &criteria.date_range;
        let date = if start.is_empty() || end.is_empty() {
            DateClause::Any
        } else {
            match (parse_date(start), parse_date(end)) {
                (Some(start), Some(end)) => DateClause::Within(start, end),
                _ => DateClause::Never,
            }
        };

        Self {
            text: fold(&criteria.text),
            category: criteria.category.clone(),
            date,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        let text = self.text.is_empty() || fold(&expense.description).contains(&self.text);
        let category = self.category.is_empty() || expense.category == self.category;
        let date = match self.date {
            DateClause::Any => true,
            DateClause::Within(start, end) => start <= expense.date && expense.date <= end,
            DateClause::Never => false,
        };
        text && category && date
    }
}

/// Returns whether `expense` belongs to the view selected by `criteria`.
pub fn matches(expense: &Expense, criteria: &FilterCriteria) -> bool {
    CompiledFilter::new(criteria).matches(expense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExpenseDraft, ExpenseId, MoneyCents};

    fn expense(description: &str, category: &str, date: &str) -> Expense {
        ExpenseDraft::new(
            description,
            MoneyCents::new(1000),
            NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            category,
        )
        .with_id(ExpenseId::new(1))
    }

    #[test]
    fn empty_criteria_match_everything() {
        let e = expense("Groceries", "Food", "2025-04-10");
        assert!(matches(&e, &FilterCriteria::cleared()));
        assert!(FilterCriteria::cleared().is_cleared());
    }

    #[test]
    fn text_clause_ignores_case() {
        let e = expense("Electricity Bill", "Utilities", "2025-04-05");
        for text in ["bill", "BILL", "Bill", "tricity b"] {
            assert!(matches(&e, &FilterCriteria::cleared().with_text(text)), "{text}");
        }
        assert_eq!(
            matches(&e, &FilterCriteria::cleared().with_text("ABC")),
            matches(&e, &FilterCriteria::cleared().with_text("abc"))
        );
        assert!(!matches(&e, &FilterCriteria::cleared().with_text("fuel")));
    }

    #[test]
    fn text_clause_normalizes_composed_characters() {
        // "Café" with a combining acute accent.
        let e = expense("Cafe\u{301} latte", "Food", "2025-04-10");
        assert!(matches(&e, &FilterCriteria::cleared().with_text("CAFÉ")));
    }

    #[test]
    fn category_clause_is_exact() {
        let e = expense("Groceries", "Food", "2025-04-10");
        assert!(matches(&e, &FilterCriteria::cleared().with_category("Food")));
        assert!(!matches(&e, &FilterCriteria::cleared().with_category("food")));
        assert!(!matches(&e, &FilterCriteria::cleared().with_category("Fo")));
    }

    #[test]
    fn date_range_is_inclusive() {
        let criteria = FilterCriteria::cleared()
            .with_start("2025-04-05")
            .with_end("2025-04-10");
        assert!(matches(&expense("a", "x", "2025-04-05"), &criteria));
        assert!(matches(&expense("a", "x", "2025-04-10"), &criteria));
        assert!(!matches(&expense("a", "x", "2025-04-04"), &criteria));
        assert!(!matches(&expense("a", "x", "2025-04-11"), &criteria));
    }

    #[test]
    fn half_open_range_does_not_constrain() {
        let e = expense("a", "x", "2020-01-01");
        assert!(matches(&e, &FilterCriteria::cleared().with_start("2025-04-05")));
        assert!(matches(&e, &FilterCriteria::cleared().with_end("2019-01-01")));
    }

    #[test]
    fn malformed_dates_only_fail_the_date_clause() {
        let e = expense("Groceries", "Food", "2025-04-10");
        let criteria = FilterCriteria::cleared()
            .with_start("not a date")
            .with_end("2025-04-30");
        assert!(!matches(&e, &criteria));
        assert!(criteria.validate().is_err());
    }

    #[test]
    fn whitespace_bound_is_present_and_never_matches() {
        let e = expense("Groceries", "Food", "2025-04-10");
        let criteria = FilterCriteria::cleared()
            .with_start(" ")
            .with_end("2025-04-30");
        assert!(!matches(&e, &criteria));
        assert!(!criteria.is_cleared());
        assert!(matches!(criteria.validate(), Err(EngineError::InvalidInput(_))));

        let only_blank_start = FilterCriteria::cleared().with_start(" ");
        assert!(matches(&e, &only_blank_start));
        assert!(!only_blank_start.is_cleared());
    }

    #[test]
    fn clauses_are_combined_with_and() {
        let e = expense("Groceries", "Food", "2025-04-10");
        let criteria = FilterCriteria::cleared().with_text("gro").with_category("Utilities");
        assert!(!matches(&e, &criteria));
    }

    #[test]
    fn validate_rejects_reversed_range() {
        let reversed = FilterCriteria::cleared()
            .with_start("2025-04-10")
            .with_end("2025-04-01");
        assert!(matches!(reversed.validate(), Err(EngineError::InvalidInput(_))));

        let ok = FilterCriteria::cleared()
            .with_start("2025-04-01")
            .with_end("2025-04-01");
        assert_eq!(ok.validate(), Ok(()));
        assert_eq!(FilterCriteria::cleared().with_start("2025-04-01").validate(), Ok(()));
    }
}
