use super::InsightContext;
use crate::core::signals::ewma::{compute_ewma_with_anomalies, current_baseline};
use crate::core::signals::model::{DailyCategorySpend, Severity, Signal, SignalType, SignalValue};
use chrono::{Datelike, NaiveDate};
use serde_json::json;

pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// Compares month-to-date spend with the share of the budget that should be
/// gone by `ctx.as_of`. On-track spending yields no signal.
pub fn build_budget_pressure_signal(
    ctx: &InsightContext,
    category: &str,
    data: &[DailyCategorySpend],
    monthly_budget: Option<f64>,
) -> Option<Signal> {
    let budget = monthly_budget.filter(|b| *b > 0.0)?;
    if data.is_empty() {
        return None;
    }
    let policy = &ctx.policy;

    let spent_so_far: f64 = data.iter().map(|d| d.total).sum();
    let month_days = days_in_month(ctx.as_of);
    let day_of_month = ctx.as_of.day();
    let days_left = month_days - day_of_month;

    let expected_by_now = budget * f64::from(day_of_month) / f64::from(month_days);
    let pressure_ratio = spent_so_far / expected_by_now;

    let severity = if pressure_ratio > policy.budget_high_ratio {
        Severity::High
    } else if pressure_ratio > policy.budget_medium_ratio {
        Severity::Medium
    } else if pressure_ratio < policy.budget_under_ratio {
        Severity::Low
    } else {
        return None;
    };

    let points = compute_ewma_with_anomalies(data, policy.alpha, policy.anomaly_factor);
    let daily_baseline = current_baseline(&points);
    let projected_monthly = spent_so_far + daily_baseline * f64::from(days_left);

    let (headline, status) = match severity {
        Severity::High => ("at risk", "significantly ahead of budget"),
        Severity::Medium => ("at risk", "slightly ahead of budget"),
        Severity::Low => ("on track", "under budget"),
    };

    Some(Signal {
        signal_type: SignalType::BudgetPressure,
        user_id: ctx.user_id.clone(),
        category: Some(category.to_string()),
        group_id: None,
        value: SignalValue::Text(severity.to_string()),
        confidence: (pressure_ratio - 1.0).abs().min(1.0),
        severity,
        title: format!("{} budget {}", category, headline),
        message: format!(
            "You've spent ${:.0} of ${:.0} ({}). Expected: ${:.0}. Projected monthly: ${:.0}",
            spent_so_far, budget, status, expected_by_now, projected_monthly
        ),
        date_range: Some(format!("{} days remaining", days_left)),
        metadata: json!({
            "spentSoFar": spent_so_far.round(),
            "expectedByNow": expected_by_now.round(),
            "projectedMonthly": projected_monthly.round(),
            "pressureRatio": (pressure_ratio * 100.0).round() / 100.0,
            "daysLeft": days_left,
            "budget": budget,
        }),
        generated_at: ctx.generated_at,
    })
}
