use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest difference tolerated between an expense amount and the sum of its
/// splits, and the magnitude under which a balance counts as settled.
pub const SPLIT_TOLERANCE: Decimal = dec!(0.01);

/// Application log entries kept in memory before the oldest are dropped.
pub const DEFAULT_APP_LOG_CAPACITY: usize = 10_000;

/// Monthly overall spending limit used by personal stats.
pub const DEFAULT_MONTHLY_BUDGET: Decimal = dec!(3500);

/// Activity log entries returned per group.
pub const ACTIVITY_PAGE_SIZE: usize = 100;

// Application log actions
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const GROUP_DELETED: &str = "GROUP_DELETED";
pub const MEMBER_INVITED: &str = "MEMBER_INVITED";
pub const MEMBER_JOINED: &str = "MEMBER_JOINED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSE_EDITED: &str = "EXPENSE_EDITED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const SETTLEMENT_RECORDED: &str = "SETTLEMENT_RECORDED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";
pub const DEBT_TREE_QUERIED: &str = "DEBT_TREE_QUERIED";
pub const PERSONAL_EXPENSE_ADDED: &str = "PERSONAL_EXPENSE_ADDED";
pub const PERSONAL_EXPENSE_EDITED: &str = "PERSONAL_EXPENSE_EDITED";
pub const PERSONAL_EXPENSES_DELETED: &str = "PERSONAL_EXPENSES_DELETED";
pub const INCOME_ADDED: &str = "INCOME_ADDED";
pub const INCOME_EDITED: &str = "INCOME_EDITED";
pub const INCOMES_DELETED: &str = "INCOMES_DELETED";
pub const INSIGHTS_GENERATED: &str = "INSIGHTS_GENERATED";
