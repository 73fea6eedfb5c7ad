//! Exponentially weighted moving average and spike detection.

use super::model::{DailyCategorySpend, EwmaPoint};

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Smooths a raw series. `ewma[0] == values[0]`.
pub fn compute_ewma(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return result;
    };

    result.push(first);
    let mut prev = first;
    for &value in iter {
        prev = alpha * value + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}

/// Smooths a daily series and flags days that exceed `anomaly_factor` times
/// the baseline as it stood before that day.
///
/// The spike is compared with the previous day's EWMA so it cannot raise its
/// own threshold. The first point is never an anomaly. Accumulation keeps full
/// precision; only the emitted `ewma` is rounded to 2 dp.
pub fn compute_ewma_with_anomalies(
    series: &[DailyCategorySpend],
    alpha: f64,
    anomaly_factor: f64,
) -> Vec<EwmaPoint> {
    let mut points = Vec::with_capacity(series.len());
    let mut ewma = match series.first() {
        Some(day) => day.total,
        None => return points,
    };

    for (i, day) in series.iter().enumerate() {
        let actual = day.total;
        let mut is_anomaly = false;
        if i > 0 {
            is_anomaly = actual > anomaly_factor * ewma;
            ewma = alpha * actual + (1.0 - alpha) * ewma;
        }

        points.push(EwmaPoint {
            date: day.date,
            actual,
            ewma: round2(ewma),
            is_anomaly,
        });
    }
    points
}

/// Last smoothed value, 0 for an empty series.
pub fn current_baseline(points: &[EwmaPoint]) -> f64 {
    points.last().map(|p| p.ewma).unwrap_or(0.0)
}

/// Difference between the last two smoothed values, 0 with fewer than two.
pub fn ewma_trend(points: &[EwmaPoint]) -> f64 {
    match points {
        [.., prev, last] => last.ewma - prev.ewma,
        _ => 0.0,
    }
}
