pub mod audit;
pub mod expense;
pub mod group;
pub mod personal;
pub mod settlement;

/// Currency amounts are exact decimals, never floats.
pub type Money = rust_decimal::Decimal;

pub use audit::{ActivityAction, ActivityLog, AppLog, EntityType};
pub use expense::{Expense, ExpenseStatus, NewExpense, Split, SplitMode};
pub use group::{Group, Member, MembershipStatus, Role};
pub use personal::{Income, IncomeUpdate, NewIncome, NewPersonalExpense, PersonalExpense, PersonalExpenseUpdate};
pub use settlement::Settlement;
