//! Spending signal engine: smoothing, volatility, outliers and the insight
//! builders on top of them. Pure functions over already-aggregated series.

pub mod aggregation;
pub mod ewma;
pub mod insights;
pub mod model;
pub mod policy;
pub mod report;
pub mod volatility;
pub mod zscore;

pub use aggregation::{aggregate_by_category, default_category_budgets};
pub use ewma::{compute_ewma, compute_ewma_with_anomalies, current_baseline, ewma_trend};
pub use insights::{InsightContext, generate_all_signals, generate_signals_for_category};
pub use model::{DailyCategorySpend, EwmaPoint, Severity, Signal, SignalType, SignalValue};
pub use policy::SignalPolicy;
pub use report::{InsightReport, SignalSummary, build_report};
pub use volatility::{
    VolatilityClass, classify_volatility, mean, rolling_volatility, standard_deviation, volatility,
};
pub use zscore::{OutlierSeverity, is_outlier, outlier_severity, z_score, z_score_in_series};
