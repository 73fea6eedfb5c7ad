use serde::{Deserialize, Serialize};

/// Every threshold that shapes signal output, in one place.
///
/// `Default` carries the stock values; `Config` can override any of them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalPolicy {
    /// EWMA smoothing factor, 0 < alpha <= 1. Lower means smoother.
    pub alpha: f64,
    /// A day is anomalous when it exceeds this multiple of the prior baseline.
    pub anomaly_factor: f64,

    pub min_days_for_trend: usize,
    pub min_days_for_anomaly: usize,
    pub min_days_for_volatility: usize,

    /// Coefficient of variation below this is LOW volatility.
    pub volatility_low: f64,
    /// Coefficient of variation at or above this is HIGH volatility.
    pub volatility_high: f64,
    /// Trailing days behind the `rollingVolatility` metadata value.
    pub rolling_window: usize,

    /// |z| above this flags an anomaly day as a statistical outlier.
    pub zscore_threshold: f64,
    pub zscore_low: f64,
    pub zscore_medium: f64,
    pub zscore_high: f64,

    /// Trends smaller than this percentage are not reported.
    pub trend_min_change_pct: f64,
    pub trend_medium_pct: f64,
    pub trend_high_pct: f64,

    pub anomaly_low_multiplier: f64,
    pub anomaly_high_multiplier: f64,

    /// Spent/expected ratios: below `under` is under budget, up to `medium`
    /// is on track, above `high` is HIGH pressure.
    pub budget_under_ratio: f64,
    pub budget_medium_ratio: f64,
    pub budget_high_ratio: f64,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        SignalPolicy {
            alpha: 0.3,
            anomaly_factor: 2.5,
            min_days_for_trend: 1,
            min_days_for_anomaly: 7,
            min_days_for_volatility: 7,
            volatility_low: 0.3,
            volatility_high: 0.6,
            rolling_window: 7,
            zscore_threshold: 2.0,
            zscore_low: 2.0,
            zscore_medium: 2.5,
            zscore_high: 3.0,
            trend_min_change_pct: 1.0,
            trend_medium_pct: 10.0,
            trend_high_pct: 20.0,
            anomaly_low_multiplier: 3.0,
            anomaly_high_multiplier: 5.0,
            budget_under_ratio: 0.8,
            budget_medium_ratio: 1.1,
            budget_high_ratio: 1.3,
        }
    }
}
