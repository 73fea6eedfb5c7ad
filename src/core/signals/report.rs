use super::ewma::compute_ewma_with_anomalies;
use super::insights::InsightContext;
use super::model::{DailyCategorySpend, EwmaPoint, Severity, Signal};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Signal counts by type and by severity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SignalSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
    /// Number of HIGH severity signals.
    pub high_priority: usize,
}

impl SignalSummary {
    pub fn from_signals(signals: &[Signal]) -> Self {
        let mut summary = SignalSummary {
            total: signals.len(),
            ..Default::default()
        };
        for signal in signals {
            *summary.by_type.entry(signal.signal_type.to_string()).or_default() += 1;
            *summary.by_severity.entry(signal.severity.to_string()).or_default() += 1;
            if signal.severity == Severity::High {
                summary.high_priority += 1;
            }
        }
        summary
    }
}

/// Ranked signals for one month plus the smoothed series behind them.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InsightReport {
    pub user_id: String,
    pub as_of: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub summary: SignalSummary,
    pub signals: Vec<Signal>,
    /// Per-category EWMA points, for charting.
    pub chart_data: BTreeMap<String, Vec<EwmaPoint>>,
}

pub fn build_report(
    ctx: &InsightContext,
    category_data: &BTreeMap<String, Vec<DailyCategorySpend>>,
    signals: Vec<Signal>,
) -> InsightReport {
    let chart_data = category_data
        .iter()
        .map(|(category, data)| {
            (
                category.clone(),
                compute_ewma_with_anomalies(data, ctx.policy.alpha, ctx.policy.anomaly_factor),
            )
        })
        .collect();

    InsightReport {
        user_id: ctx.user_id.clone(),
        as_of: ctx.as_of,
        generated_at: ctx.generated_at,
        summary: SignalSummary::from_signals(&signals),
        signals,
        chart_data,
    }
}
