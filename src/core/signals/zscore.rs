use super::policy::SignalPolicy;
use super::volatility::{mean, standard_deviation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutlierSeverity {
    None,
    Low,
    Medium,
    High,
}

/// Standard deviations between `value` and `mean`; 0 when `std` is 0.
pub fn z_score(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        return 0.0;
    }
    (value - mean) / std
}

pub fn z_score_in_series(value: f64, series: &[f64]) -> f64 {
    z_score(value, mean(series), standard_deviation(series))
}

pub fn is_outlier(value: f64, series: &[f64], threshold: f64) -> bool {
    z_score_in_series(value, series).abs() > threshold
}

pub fn outlier_severity(z: f64, policy: &SignalPolicy) -> OutlierSeverity {
    let abs_z = z.abs();
    if abs_z < policy.zscore_low {
        OutlierSeverity::None
    } else if abs_z < policy.zscore_medium {
        OutlierSeverity::Low
    } else if abs_z < policy.zscore_high {
        OutlierSeverity::Medium
    } else {
        OutlierSeverity::High
    }
}
