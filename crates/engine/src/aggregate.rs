//! Summary statistics and category breakdowns.
//!
//! Both functions are single pass over any sequence of records. Ties are
//! resolved by encounter order: the first record (or category) seen wins.
use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::{Expense, MoneyCents};

/// Per-category totals in first-seen order.
///
/// Serializes as a map from category to cents, keeping that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryDistribution {
    entries: Vec<(String, MoneyCents)>,
    index: HashMap<String, usize>,
}

impl Serialize for CategoryDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category, amount)?;
        }
        map.end()
    }
}

impl CategoryDistribution {
    fn add(&mut self, category: &str, amount: MoneyCents) {
        match self.index.get(category) {
            Some(&slot) => self.entries[slot].1 += amount,
            None => {
                self.index.insert(category.to_string(), self.entries.len());
                self.entries.push((category.to_string(), amount));
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<MoneyCents> {
        self.index.get(category).map(|&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MoneyCents)> {
        self.entries
            .iter()
            .map(|(category, amount)| (category.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every category total.
    pub fn total(&self) -> MoneyCents {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    /// The greatest positive total; the earliest category wins a tie.
    fn top(&self) -> Option<(&str, MoneyCents)> {
        let mut best: Option<(&str, MoneyCents)> = None;
        let mut top = MoneyCents::ZERO;
        for (category, amount) in self.iter() {
            if amount > top {
                top = amount;
                best = Some((category, amount));
            }
        }
        best
    }
}

/// Headline statistics over a set of records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: MoneyCents,
    pub count: usize,
    pub highest: Option<Expense>,
    pub most_recent: Option<Expense>,
    pub top_category: Option<String>,
    pub top_category_amount: MoneyCents,
}

/// Computes the [`Summary`] of `records`.
///
/// An empty input yields zero totals and `None` for every record/category slot.
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut total = MoneyCents::ZERO;
    let mut count = 0;
    let mut highest: Option<&Expense> = None;
    let mut most_recent: Option<&Expense> = None;
    let mut by_category = CategoryDistribution::default();

    for expense in records {
        total += expense.amount;
        count += 1;
        if highest.is_none_or(|best| expense.amount > best.amount) {
            highest = Some(expense);
        }
        if most_recent.is_none_or(|best| expense.date > best.date) {
            most_recent = Some(expense);
        }
        by_category.add(&expense.category, expense.amount);
    }

    let (top_category, top_category_amount) = match by_category.top() {
        Some((category, amount)) => (Some(category.to_string()), amount),
        None => (None, MoneyCents::ZERO),
    };

    Summary {
        total,
        count,
        highest: highest.cloned(),
        most_recent: most_recent.cloned(),
        top_category,
        top_category_amount,
    }
}

/// Sums amounts per category. Categories without records never appear.
pub fn category_distribution<'a, I>(records: I) -> CategoryDistribution
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut distribution = CategoryDistribution::default();
    for expense in records {
        distribution.add(&expense.category, expense.amount);
    }
    distribution
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{ExpenseDraft, ExpenseId};

    fn expense(id: u64, description: &str, cents: i64, date: &str, category: &str) -> Expense {
        ExpenseDraft::new(
            description,
            MoneyCents::new(cents),
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category,
        )
        .with_id(ExpenseId::new(id))
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, "Groceries", 12565, "2025-04-10", "Food"),
            expense(2, "Electricity Bill", 8543, "2025-04-05", "Utilities"),
            expense(3, "Movie Tickets", 4850, "2025-04-08", "Entertainment"),
            expense(4, "Fuel", 6000, "2025-04-12", "Transportation"),
        ]
    }

    #[test]
    fn empty_input_yields_sentinels() {
        let none: Vec<Expense> = Vec::new();
        let summary = summarize(&none);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.total, MoneyCents::ZERO);
        assert_eq!(summary.count, 0);
        assert!(summary.highest.is_none());
        assert!(summary.most_recent.is_none());
        assert!(summary.top_category.is_none());
        assert!(category_distribution(&none).is_empty());
    }

    #[test]
    fn summary_over_sample() {
        let records = sample();
        let summary = summarize(&records);
        assert_eq!(summary.total, MoneyCents::new(31958));
        assert_eq!(summary.count, 4);
        assert_eq!(summary.highest.unwrap().description, "Groceries");
        assert_eq!(summary.most_recent.unwrap().description, "Fuel");
        assert_eq!(summary.top_category.as_deref(), Some("Food"));
        assert_eq!(summary.top_category_amount, MoneyCents::new(12565));
    }

    #[test]
    fn total_does_not_depend_on_order() {
        let records = sample();
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(summarize(&records).total, summarize(&reversed).total);
    }

    #[test]
    fn ties_go_to_first_encountered() {
        let records = vec![
            expense(1, "first", 5000, "2025-04-10", "A"),
            expense(2, "second", 5000, "2025-04-10", "B"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.top_category.as_deref(), Some("A"));
        assert_eq!(summary.top_category_amount, MoneyCents::new(5000));
        assert_eq!(summary.highest.unwrap().id, ExpenseId::new(1));
        assert_eq!(summary.most_recent.unwrap().id, ExpenseId::new(1));
    }

    #[test]
    fn top_category_uses_summed_amounts() {
        let records = vec![
            expense(1, "big", 9000, "2025-04-01", "A"),
            expense(2, "small", 5000, "2025-04-02", "B"),
            expense(3, "small", 5000, "2025-04-03", "B"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.top_category.as_deref(), Some("B"));
        assert_eq!(summary.top_category_amount, MoneyCents::new(10000));
        assert_eq!(summary.highest.unwrap().id, ExpenseId::new(1));
    }

    #[test]
    fn distribution_serializes_as_ordered_map() {
        let records = sample();
        let json = serde_json::to_string(&category_distribution(&records)).unwrap();
        assert_eq!(
            json,
            r#"{"Food":12565,"Utilities":8543,"Entertainment":4850,"Transportation":6000}"#
        );
    }

    #[test]
    fn no_top_category_without_a_positive_total() {
        let records = vec![
            expense(1, "refund", -500, "2025-04-01", "A"),
            expense(2, "free", 0, "2025-04-02", "B"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.top_category, None);
        assert_eq!(summary.top_category_amount, MoneyCents::ZERO);
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn distribution_keeps_first_seen_order_and_matches_total() {
        let mut records = sample();
        records.push(expense(5, "Snacks", 435, "2025-04-13", "Food"));

        let distribution = category_distribution(&records);
        let categories: Vec<&str> = distribution.iter().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            ["Food", "Utilities", "Entertainment", "Transportation"]
        );
        assert_eq!(distribution.get("Food"), Some(MoneyCents::new(13000)));
        assert_eq!(distribution.get("Housing"), None);
        assert_eq!(distribution.total(), summarize(&records).total);
    }
}
