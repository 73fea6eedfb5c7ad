use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One category's spending on one calendar day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyCategorySpend {
    pub date: NaiveDate,
    pub category: String,
    pub total: f64,
    pub count: u32,
}

impl DailyCategorySpend {
    pub fn new(date: NaiveDate, category: impl Into<String>, total: f64) -> Self {
        DailyCategorySpend {
            date,
            category: category.into(),
            total,
            count: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EwmaPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub ewma: f64,
    pub is_anomaly: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Trend,
    Anomaly,
    Volatility,
    BudgetPressure,
    BehaviorPattern,
    GroupImbalance,
    ForecastRisk,
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SignalType::Trend => "TREND",
            SignalType::Anomaly => "ANOMALY",
            SignalType::Volatility => "VOLATILITY",
            SignalType::BudgetPressure => "BUDGET_PRESSURE",
            SignalType::BehaviorPattern => "BEHAVIOR_PATTERN",
            SignalType::GroupImbalance => "GROUP_IMBALANCE",
            SignalType::ForecastRisk => "FORECAST_RISK",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Sort key: HIGH first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SignalValue {
    Number(f64),
    Text(String),
}

/// One generated insight. Never persisted.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub user_id: String,
    pub category: Option<String>,
    pub group_id: Option<Uuid>,
    pub value: SignalValue,
    pub confidence: f64,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub date_range: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub generated_at: DateTime<Utc>,
}
