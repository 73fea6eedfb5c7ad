//! Signal builders and the per-category / per-user orchestration.

mod anomaly;
mod budget_pressure;
mod trend;
mod volatility;

pub use anomaly::build_anomaly_signal;
pub use budget_pressure::{build_budget_pressure_signal, days_in_month};
pub use trend::build_trend_signal;
pub use volatility::build_volatility_signal;

use super::model::{DailyCategorySpend, Signal};
use super::policy::SignalPolicy;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Everything a builder needs besides the series itself.
#[derive(Clone, Debug)]
pub struct InsightContext {
    pub user_id: String,
    /// The day signals are generated for; drives month progress.
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub policy: SignalPolicy,
}

impl InsightContext {
    pub fn new(user_id: impl Into<String>, as_of: NaiveDate, policy: SignalPolicy) -> Self {
        InsightContext {
            user_id: user_id.into(),
            as_of,
            generated_at: Utc::now(),
            policy,
        }
    }
}

/// All signals for one category, HIGH severity first.
pub fn generate_signals_for_category(
    ctx: &InsightContext,
    category: &str,
    data: &[DailyCategorySpend],
    monthly_budget: Option<f64>,
) -> Vec<Signal> {
    let mut signals: Vec<Signal> = [
        build_trend_signal(ctx, category, data),
        build_anomaly_signal(ctx, category, data),
        build_volatility_signal(ctx, category, data),
        build_budget_pressure_signal(ctx, category, data, monthly_budget),
    ]
    .into_iter()
    .flatten()
    .collect();

    signals.sort_by_key(|s| s.severity.rank());
    signals
}

/// Signals across every category, ranked by severity then confidence.
///
/// Categories are visited in name order and the sort is stable, so equal
/// severity and confidence keep category order.
pub fn generate_all_signals(
    ctx: &InsightContext,
    category_data: &BTreeMap<String, Vec<DailyCategorySpend>>,
    budgets: &HashMap<String, f64>,
) -> Vec<Signal> {
    let mut all: Vec<Signal> = category_data
        .iter()
        .flat_map(|(category, data)| {
            generate_signals_for_category(ctx, category, data, budgets.get(category).copied())
        })
        .collect();

    all.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });

    debug!(
        "Generated {} signals across {} categories for user {}",
        all.len(),
        category_data.len(),
        ctx.user_id
    );
    all
}
