use super::InsightContext;
use crate::core::signals::ewma::round2;
use crate::core::signals::model::{DailyCategorySpend, Severity, Signal, SignalType, SignalValue};
use crate::core::signals::volatility::{VolatilityClass, classify_volatility, rolling_volatility, volatility};
use serde_json::json;

/// Only LOW and HIGH volatility are worth reporting; NORMAL yields nothing.
pub fn build_volatility_signal(
    ctx: &InsightContext,
    category: &str,
    data: &[DailyCategorySpend],
) -> Option<Signal> {
    let policy = &ctx.policy;
    if data.len() < policy.min_days_for_volatility {
        return None;
    }

    let values: Vec<f64> = data.iter().map(|d| d.total).collect();
    let vol = volatility(&values);
    let class = classify_volatility(vol, policy);
    let recent = rolling_volatility(&values, policy.rolling_window)
        .last()
        .copied()
        .unwrap_or(0.0);

    let (severity, adjective, description) = match class {
        VolatilityClass::Normal => return None,
        VolatilityClass::High => (
            Severity::Medium,
            "unstable",
            "varies significantly day-to-day (high volatility)",
        ),
        VolatilityClass::Low => (
            Severity::Low,
            "stable",
            "is very consistent (low volatility)",
        ),
    };

    Some(Signal {
        signal_type: SignalType::Volatility,
        user_id: ctx.user_id.clone(),
        category: Some(category.to_string()),
        group_id: None,
        value: SignalValue::Text(class.as_str().to_string()),
        confidence: vol.min(1.0),
        severity,
        title: format!("{} spending is {}", category, adjective),
        message: format!(
            "Your {} spending {}. Volatility score: {:.0}%",
            category.to_lowercase(),
            description,
            vol * 100.0
        ),
        date_range: Some(format!("Last {} days", data.len())),
        metadata: json!({
            "score": round2(vol),
            "stdRatio": round2(vol),
            "rollingWindow": policy.rolling_window,
            "rollingVolatility": round2(recent),
        }),
        generated_at: ctx.generated_at,
    })
}
