use super::InsightContext;
use crate::core::signals::ewma::{compute_ewma_with_anomalies, current_baseline};
use crate::core::signals::ewma::round2;
use crate::core::signals::model::{DailyCategorySpend, Severity, Signal, SignalType, SignalValue};
use crate::core::signals::zscore::{is_outlier, outlier_severity, z_score_in_series};
use serde_json::json;

const CONFIDENCE_SPAN_MULTIPLIER: f64 = 10.0;

/// Reports the most recent spike in the window, if any.
pub fn build_anomaly_signal(
    ctx: &InsightContext,
    category: &str,
    data: &[DailyCategorySpend],
) -> Option<Signal> {
    let policy = &ctx.policy;
    if data.len() < policy.min_days_for_anomaly {
        return None;
    }

    let points = compute_ewma_with_anomalies(data, policy.alpha, policy.anomaly_factor);
    let latest = points.iter().rev().find(|p| p.is_anomaly)?;

    let baseline = current_baseline(&points);
    let multiplier = if baseline > 0.0 {
        latest.actual / baseline
    } else {
        0.0
    };

    let severity = if multiplier > policy.anomaly_high_multiplier {
        Severity::High
    } else if multiplier < policy.anomaly_low_multiplier {
        Severity::Low
    } else {
        Severity::Medium
    };

    let values: Vec<f64> = data.iter().map(|d| d.total).collect();
    let z = z_score_in_series(latest.actual, &values);

    let day = latest.date.format("%b %-d").to_string();

    Some(Signal {
        signal_type: SignalType::Anomaly,
        user_id: ctx.user_id.clone(),
        category: Some(category.to_string()),
        group_id: None,
        value: SignalValue::Number(latest.actual),
        confidence: (multiplier / CONFIDENCE_SPAN_MULTIPLIER).min(1.0),
        severity,
        title: "Unusual large expense detected".to_string(),
        message: format!(
            "Your {} spending was {:.1}x higher than usual on {} (${:.0} vs baseline ${:.0})",
            category.to_lowercase(),
            multiplier,
            day,
            latest.actual,
            baseline
        ),
        date_range: Some(day),
        metadata: json!({
            "baseline": baseline.round(),
            "multiplier": (multiplier * 10.0).round() / 10.0,
            "date": latest.date,
            "zScore": round2(z),
            "isOutlier": is_outlier(latest.actual, &values, policy.zscore_threshold),
            "outlierSeverity": outlier_severity(z, policy),
        }),
        generated_at: ctx.generated_at,
    })
}
