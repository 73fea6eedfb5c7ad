use super::model::DailyCategorySpend;
use crate::core::models::{Money, PersonalExpense};
use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, HashMap};

/// Folds one user's expense rows for the calendar month containing `month`
/// into per-category daily totals, each series sorted by date.
pub fn aggregate_by_category(
    expenses: &[PersonalExpense],
    month: NaiveDate,
) -> BTreeMap<String, Vec<DailyCategorySpend>> {
    let mut by_category: BTreeMap<&str, BTreeMap<NaiveDate, (Money, u32)>> = BTreeMap::new();

    for expense in expenses
        .iter()
        .filter(|e| e.date.year() == month.year() && e.date.month() == month.month())
    {
        let day = by_category
            .entry(expense.category.as_str())
            .or_default()
            .entry(expense.date)
            .or_insert((Decimal::ZERO, 0));
        day.0 += expense.amount;
        day.1 += 1;
    }

    let result: BTreeMap<String, Vec<DailyCategorySpend>> = by_category
        .into_iter()
        .map(|(category, days)| {
            let series = days
                .into_iter()
                .map(|(date, (total, count))| DailyCategorySpend {
                    date,
                    category: category.to_string(),
                    total: total.to_f64().unwrap_or(0.0),
                    count,
                })
                .collect();
            (category.to_string(), series)
        })
        .collect();

    debug!(
        "Aggregated {} expenses into {} categories for {}-{:02}",
        expenses.len(),
        result.len(),
        month.year(),
        month.month()
    );
    result
}

/// Built-in monthly limits used when no budget is configured.
pub fn default_category_budgets() -> HashMap<String, f64> {
    [
        ("Food", 8000.0),
        ("Travel", 5000.0),
        ("Groceries", 6000.0),
        ("Rent_utilities", 15000.0),
        ("Personal_utilities", 4000.0),
        ("Other", 3000.0),
    ]
    .into_iter()
    .map(|(category, budget)| (category.to_string(), budget))
    .collect()
}
