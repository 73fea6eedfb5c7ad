use super::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExpenseStatus {
    Active,
    Deleted,
}

/// One member's owed share of one expense.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Split {
    pub member_id: Uuid,
    #[schema(value_type = String, example = "30.00")]
    pub amount: Money,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub paid_by: Uuid,
    #[schema(value_type = String, example = "90.00")]
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub status: ExpenseStatus,
    pub splits: Vec<Split>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn is_active(&self) -> bool {
        self.status == ExpenseStatus::Active
    }

    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }
}

/// How the shares of a new or edited expense are determined.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "mode", content = "entries", rename_all = "lowercase")]
pub enum SplitMode {
    /// Divide the amount evenly between the listed members.
    Equal(Vec<Uuid>),
    /// Caller-provided shares; must add up to the amount.
    Custom(Vec<Split>),
}

/// Input for adding or editing a group expense.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewExpense {
    pub paid_by: Uuid,
    #[schema(value_type = String, example = "90.00")]
    pub amount: Money,
    pub category: Option<String>,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub split: SplitMode,
}
