use super::InsightContext;
use crate::core::signals::ewma::{compute_ewma_with_anomalies, current_baseline, ewma_trend};
use crate::core::signals::model::{DailyCategorySpend, Severity, Signal, SignalType, SignalValue};
use serde_json::json;

const CONFIDENCE_SPAN_PCT: f64 = 30.0;

/// Direction of the smoothed baseline over the last day.
pub fn build_trend_signal(
    ctx: &InsightContext,
    category: &str,
    data: &[DailyCategorySpend],
) -> Option<Signal> {
    let policy = &ctx.policy;
    if data.len() < policy.min_days_for_trend.max(1) {
        return None;
    }

    let points = compute_ewma_with_anomalies(data, policy.alpha, policy.anomaly_factor);
    let trend = ewma_trend(&points);
    let baseline = current_baseline(&points);
    if baseline == 0.0 {
        return None;
    }

    let change_pct = trend / baseline * 100.0;
    let abs_change_pct = change_pct.abs();
    if abs_change_pct < policy.trend_min_change_pct {
        return None;
    }

    let severity = if abs_change_pct > policy.trend_high_pct {
        Severity::High
    } else if abs_change_pct > policy.trend_medium_pct {
        Severity::Medium
    } else {
        Severity::Low
    };

    let (direction, verb) = if trend > 0.0 {
        ("UP", "increased")
    } else {
        ("DOWN", "decreased")
    };

    Some(Signal {
        signal_type: SignalType::Trend,
        user_id: ctx.user_id.clone(),
        category: Some(category.to_string()),
        group_id: None,
        value: SignalValue::Text(direction.to_string()),
        confidence: (abs_change_pct / CONFIDENCE_SPAN_PCT).min(1.0),
        severity,
        title: format!(
            "{} spending is trending {}",
            category,
            direction.to_lowercase()
        ),
        message: format!(
            "Your {} spending has {} by {:.0}% compared to your baseline of ${:.0}",
            category.to_lowercase(),
            verb,
            abs_change_pct,
            baseline
        ),
        date_range: Some(format!("Last {} days", data.len())),
        metadata: json!({
            "delta": trend.round(),
            "baseline": baseline.round(),
            "changePct": change_pct.round(),
        }),
        generated_at: ctx.generated_at,
    })
}
