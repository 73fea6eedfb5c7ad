//! Month-level views over a user's personal expenses and income.

use crate::core::models::{Income, Money, PersonalExpense};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// Spending per category for one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyBreakdown {
    /// Display label, e.g. `September 2026`.
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    #[schema(value_type = Object)]
    pub categories: BTreeMap<String, Money>,
    #[schema(value_type = String)]
    pub total: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotal {
    #[schema(value_type = String)]
    pub total: Money,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

/// Expense or income row in the merged monthly feed. `label` is the
/// category for an expense and the source for income.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[schema(value_type = String)]
    pub amount: Money,
    pub label: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BudgetProgress {
    #[schema(value_type = String)]
    pub limit: Money,
    #[schema(value_type = String)]
    pub spent: Money,
    /// Negative once the limit is exceeded.
    #[schema(value_type = String)]
    pub remaining: Money,
    /// Percent of the limit spent, 2 dp.
    pub progress: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PersonalStats {
    pub year: i32,
    pub month: u32,
    #[schema(value_type = String)]
    pub total_income: Money,
    #[schema(value_type = String)]
    pub total_expenses: Money,
    #[schema(value_type = Object)]
    pub income_by_source: BTreeMap<String, Money>,
    pub spending_by_category: BTreeMap<String, CategoryTotal>,
    /// Every transaction in the month, newest first.
    pub recent_transactions: Vec<Transaction>,
    pub budget: BudgetProgress,
}

fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Per-month category totals, oldest month first.
///
/// Every month lists the `seed_categories` (at zero when nothing was spent)
/// plus any other category that has spending.
pub fn monthly_breakdown(expenses: &[PersonalExpense], seed_categories: &[String]) -> Vec<MonthlyBreakdown> {
    let mut months: BTreeMap<(i32, u32), BTreeMap<String, Money>> = BTreeMap::new();

    for expense in expenses {
        let categories = months
            .entry((expense.date.year(), expense.date.month()))
            .or_insert_with(|| {
                seed_categories
                    .iter()
                    .map(|c| (c.clone(), Decimal::ZERO))
                    .collect()
            });
        *categories.entry(expense.category.clone()).or_default() += expense.amount;
    }

    months
        .into_iter()
        .filter_map(|((year, month_number), categories)| {
            let first = NaiveDate::from_ymd_opt(year, month_number, 1)?;
            Some(MonthlyBreakdown {
                month: first.format("%B %Y").to_string(),
                year,
                month_number,
                total: categories.values().copied().sum(),
                categories,
            })
        })
        .collect()
}

/// Income, spending and budget progress for one calendar month.
pub fn personal_stats(
    expenses: &[PersonalExpense],
    incomes: &[Income],
    year: i32,
    month: u32,
    budget_limit: Money,
) -> PersonalStats {
    let expenses: Vec<&PersonalExpense> = expenses.iter().filter(|e| in_month(e.date, year, month)).collect();
    let incomes: Vec<&Income> = incomes.iter().filter(|i| in_month(i.date, year, month)).collect();

    let total_expenses: Money = expenses.iter().map(|e| e.amount).sum();
    let total_income: Money = incomes.iter().map(|i| i.amount).sum();

    let mut income_by_source: BTreeMap<String, Money> = BTreeMap::new();
    for income in &incomes {
        *income_by_source.entry(income.source.clone()).or_default() += income.amount;
    }

    let mut spending_by_category: BTreeMap<String, CategoryTotal> = BTreeMap::new();
    for expense in &expenses {
        let entry = spending_by_category.entry(expense.category.clone()).or_default();
        entry.total += expense.amount;
        entry.count += 1;
    }

    let mut recent_transactions: Vec<Transaction> = expenses
        .iter()
        .map(|e| Transaction {
            id: e.id,
            kind: TransactionKind::Expense,
            amount: e.amount,
            label: e.category.clone(),
            description: e.description.clone(),
            date: e.date,
        })
        .chain(incomes.iter().map(|i| Transaction {
            id: i.id,
            kind: TransactionKind::Income,
            amount: i.amount,
            label: i.source.clone(),
            description: i.description.clone(),
            date: i.date,
        }))
        .collect();
    recent_transactions.sort_by(|a, b| b.date.cmp(&a.date));

    let progress = if budget_limit > Decimal::ZERO {
        (total_expenses / budget_limit * Decimal::ONE_HUNDRED)
            .round_dp(2)
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    PersonalStats {
        year,
        month,
        total_income,
        total_expenses,
        income_by_source,
        spending_by_category,
        recent_transactions,
        budget: BudgetProgress {
            limit: budget_limit,
            spent: total_expenses,
            remaining: budget_limit - total_expenses,
            progress,
        },
    }
}
