use crate::core::constants::{DEFAULT_APP_LOG_CAPACITY, DEFAULT_MONTHLY_BUDGET};
use crate::core::models::Money;
use crate::core::signals::{SignalPolicy, default_category_budgets};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub signal_policy: SignalPolicy,
    /// Monthly limit per category name.
    pub category_budgets: HashMap<String, f64>,
    /// Overall monthly spending limit shown in personal stats.
    pub monthly_budget_limit: Money,
    /// Application log entries kept in memory.
    pub app_log_capacity: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses `Food=500,Travel=200`; malformed entries are skipped.
pub fn parse_budgets(raw: &str) -> HashMap<String, f64> {
    raw.split(',')
        .filter_map(|entry| {
            let (category, amount) = entry.split_once('=')?;
            let amount: f64 = amount.trim().parse().ok()?;
            let category = category.trim();
            (!category.is_empty()).then(|| (category.to_string(), amount))
        })
        .collect()
}

fn signal_policy_from_env() -> SignalPolicy {
    let d = SignalPolicy::default();
    SignalPolicy {
        alpha: env_or("SIGNAL_ALPHA", d.alpha),
        anomaly_factor: env_or("SIGNAL_ANOMALY_FACTOR", d.anomaly_factor),
        min_days_for_trend: env_or("SIGNAL_MIN_DAYS_TREND", d.min_days_for_trend),
        min_days_for_anomaly: env_or("SIGNAL_MIN_DAYS_ANOMALY", d.min_days_for_anomaly),
        min_days_for_volatility: env_or("SIGNAL_MIN_DAYS_VOLATILITY", d.min_days_for_volatility),
        volatility_low: env_or("SIGNAL_VOLATILITY_LOW", d.volatility_low),
        volatility_high: env_or("SIGNAL_VOLATILITY_HIGH", d.volatility_high),
        rolling_window: env_or("SIGNAL_ROLLING_WINDOW", d.rolling_window),
        zscore_threshold: env_or("SIGNAL_ZSCORE_THRESHOLD", d.zscore_threshold),
        zscore_low: env_or("SIGNAL_ZSCORE_LOW", d.zscore_low),
        zscore_medium: env_or("SIGNAL_ZSCORE_MEDIUM", d.zscore_medium),
        zscore_high: env_or("SIGNAL_ZSCORE_HIGH", d.zscore_high),
        trend_min_change_pct: env_or("SIGNAL_TREND_MIN_PCT", d.trend_min_change_pct),
        trend_medium_pct: env_or("SIGNAL_TREND_MEDIUM_PCT", d.trend_medium_pct),
        trend_high_pct: env_or("SIGNAL_TREND_HIGH_PCT", d.trend_high_pct),
        anomaly_low_multiplier: env_or("SIGNAL_ANOMALY_LOW_MULTIPLIER", d.anomaly_low_multiplier),
        anomaly_high_multiplier: env_or("SIGNAL_ANOMALY_HIGH_MULTIPLIER", d.anomaly_high_multiplier),
        budget_under_ratio: env_or("SIGNAL_BUDGET_UNDER_RATIO", d.budget_under_ratio),
        budget_medium_ratio: env_or("SIGNAL_BUDGET_MEDIUM_RATIO", d.budget_medium_ratio),
        budget_high_ratio: env_or("SIGNAL_BUDGET_HIGH_RATIO", d.budget_high_ratio),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
            request_timeout_secs: 30,
            signal_policy: SignalPolicy::default(),
            category_budgets: default_category_budgets(),
            monthly_budget_limit: DEFAULT_MONTHLY_BUDGET,
            app_log_capacity: DEFAULT_APP_LOG_CAPACITY,
        }
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        let mut category_budgets = default_category_budgets();
        if let Ok(raw) = env::var("CATEGORY_BUDGETS") {
            category_budgets.extend(parse_budgets(&raw));
        }

        Self {
            port: env_or("PORT", 3000),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            signal_policy: signal_policy_from_env(),
            category_budgets,
            monthly_budget_limit: env_or("MONTHLY_BUDGET_LIMIT", DEFAULT_MONTHLY_BUDGET),
            app_log_capacity: env_or("APP_LOG_CAPACITY", DEFAULT_APP_LOG_CAPACITY),
        }
    }
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
