use crate::core::constants::SPLIT_TOLERANCE;
use crate::core::errors::FairshareError;
use crate::core::ledger::splits::is_whole_cents;
use crate::core::models::{Expense, Member, Money, Settlement, Split};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

/// Net position of one member inside a group.
///
/// `balance = total_paid - total_owed + settlements_received - settlements_paid`.
/// Positive means the member is owed money, negative means they owe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MemberBalance {
    pub member_id: Uuid,
    #[schema(value_type = String)]
    pub balance: Money,
    #[schema(value_type = String)]
    pub total_paid: Money,
    #[schema(value_type = String)]
    pub total_owed: Money,
    #[schema(value_type = String)]
    pub settlements_received: Money,
    #[schema(value_type = String)]
    pub settlements_paid: Money,
}

impl MemberBalance {
    fn zero(member_id: Uuid) -> Self {
        MemberBalance {
            member_id,
            ..Default::default()
        }
    }
}

/// Rejects ledger input that would silently produce wrong balances.
///
/// Only active expenses are checked; deleted ones never reach the engine.
pub fn validate_ledger(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<(), FairshareError> {
    let member_ids: HashSet<Uuid> = members.iter().map(|m| m.id).collect();

    for expense in expenses.iter().filter(|e| e.is_active()) {
        if !member_ids.contains(&expense.paid_by) {
            warn!("Expense {} paid by non-member {}", expense.id, expense.paid_by);
            return Err(FairshareError::UnknownMember(expense.paid_by.to_string()));
        }
        if expense.amount <= Decimal::ZERO {
            return Err(FairshareError::InvalidAmount("amount".to_string(), expense.amount));
        }
        validate_splits(expense.amount, &expense.splits, &member_ids)?;
    }

    for settlement in settlements {
        for party in [settlement.from_member_id, settlement.to_member_id] {
            if !member_ids.contains(&party) {
                warn!("Settlement {} references non-member {}", settlement.id, party);
                return Err(FairshareError::UnknownMember(party.to_string()));
            }
        }
        if settlement.from_member_id == settlement.to_member_id {
            return Err(FairshareError::SelfSettlement);
        }
        if settlement.amount <= Decimal::ZERO {
            return Err(FairshareError::InvalidAmount("amount".to_string(), settlement.amount));
        }
    }

    Ok(())
}

/// Checks one split set against its expense amount and the group roster.
pub fn validate_splits(
    amount: Money,
    splits: &[Split],
    member_ids: &HashSet<Uuid>,
) -> Result<(), FairshareError> {
    if splits.is_empty() {
        return Err(FairshareError::InvalidSplit);
    }
    for split in splits {
        if !member_ids.contains(&split.member_id) {
            warn!("Split references non-member {}", split.member_id);
            return Err(FairshareError::InvalidSplitUser(split.member_id.to_string()));
        }
        if split.amount < Decimal::ZERO || !is_whole_cents(split.amount) {
            return Err(FairshareError::InvalidAmount("split".to_string(), split.amount));
        }
    }

    let total: Money = splits.iter().map(|s| s.amount).sum();
    if (total - amount).abs() > SPLIT_TOLERANCE {
        warn!("Split total {} does not match amount {}", total, amount);
        return Err(FairshareError::SplitSumMismatch {
            expected: amount,
            actual: total,
        });
    }
    Ok(())
}

/// One balance record per member, from active expenses and all settlements.
pub fn compute_balances(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<BTreeMap<Uuid, MemberBalance>, FairshareError> {
    validate_ledger(members, expenses, settlements)?;

    let mut balances: BTreeMap<Uuid, MemberBalance> = members
        .iter()
        .map(|m| (m.id, MemberBalance::zero(m.id)))
        .collect();

    for expense in expenses.iter().filter(|e| e.is_active()) {
        if let Some(payer) = balances.get_mut(&expense.paid_by) {
            payer.total_paid += expense.amount;
            payer.balance += expense.amount;
        }
        for split in &expense.splits {
            if let Some(owing) = balances.get_mut(&split.member_id) {
                owing.total_owed += split.amount;
                owing.balance -= split.amount;
            }
        }
    }

    for settlement in settlements {
        if let Some(payee) = balances.get_mut(&settlement.to_member_id) {
            payee.settlements_received += settlement.amount;
            payee.balance += settlement.amount;
        }
        if let Some(payer) = balances.get_mut(&settlement.from_member_id) {
            payer.settlements_paid += settlement.amount;
            payer.balance -= settlement.amount;
        }
    }

    debug!("Balances calculated for {} members", balances.len());
    Ok(balances)
}

/// Balances still to be settled: expense-only positions with every recorded
/// settlement taken back out.
pub fn remaining_balances(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<BTreeMap<Uuid, Money>, FairshareError> {
    validate_ledger(members, expenses, settlements)?;

    let mut remaining: BTreeMap<Uuid, Money> =
        members.iter().map(|m| (m.id, Decimal::ZERO)).collect();

    for expense in expenses.iter().filter(|e| e.is_active()) {
        if let Some(b) = remaining.get_mut(&expense.paid_by) {
            *b += expense.amount;
        }
        for split in &expense.splits {
            if let Some(b) = remaining.get_mut(&split.member_id) {
                *b -= split.amount;
            }
        }
    }

    // payee already received part of their credit, payer already paid part of their debt
    for settlement in settlements {
        if let Some(b) = remaining.get_mut(&settlement.to_member_id) {
            *b -= settlement.amount;
        }
        if let Some(b) = remaining.get_mut(&settlement.from_member_id) {
            *b += settlement.amount;
        }
    }

    Ok(remaining)
}
