use super::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A single personal (non-group) expense row.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonalExpense {
    pub id: Uuid,
    pub user_id: String,
    #[schema(value_type = String, example = "12.50")]
    pub amount: Money,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewPersonalExpense {
    #[schema(value_type = String, example = "12.50")]
    pub amount: Money,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PersonalExpenseUpdate {
    #[schema(value_type = Option<String>, example = "12.50")]
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Money coming in for a user, e.g. salary or a refund.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Income {
    pub id: Uuid,
    pub user_id: String,
    #[schema(value_type = String, example = "2500.00")]
    pub amount: Money,
    pub source: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewIncome {
    #[schema(value_type = String, example = "2500.00")]
    pub amount: Money,
    pub source: String,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct IncomeUpdate {
    #[schema(value_type = Option<String>, example = "2500.00")]
    pub amount: Option<Money>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}
