//! Group ledger: balances per member and the minimal transfers that settle them.
//!
//! Everything here is pure and synchronous. Callers hand in one consistent
//! snapshot of a group's members, expenses and settlements.

pub mod balances;
pub mod debt_tree;
pub mod splits;

pub use balances::{MemberBalance, compute_balances, remaining_balances, validate_ledger, validate_splits};
pub use debt_tree::{Transfer, debt_tree, plan_transfers};
pub use splits::{equal_split, reconcile_splits};
