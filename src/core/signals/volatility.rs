use super::policy::SignalPolicy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityClass {
    Low,
    Normal,
    High,
}

impl VolatilityClass {
    pub fn as_str(self) -> &'static str {
        match self {
            VolatilityClass::Low => "LOW",
            VolatilityClass::Normal => "NORMAL",
            VolatilityClass::High => "HIGH",
        }
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation, `stddev / mean`. 0 when the mean is 0.
pub fn volatility(values: &[f64]) -> f64 {
    let avg = mean(values);
    if avg == 0.0 {
        return 0.0;
    }
    standard_deviation(values) / avg
}

pub fn classify_volatility(vol: f64, policy: &SignalPolicy) -> VolatilityClass {
    if vol < policy.volatility_low {
        VolatilityClass::Low
    } else if vol < policy.volatility_high {
        VolatilityClass::Normal
    } else {
        VolatilityClass::High
    }
}

/// Volatility of the trailing `window` values at every position.
pub fn rolling_volatility(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            volatility(&values[start..=i])
        })
        .collect()
}
