use super::balances::remaining_balances;
use crate::core::constants::SPLIT_TOLERANCE;
use crate::core::errors::FairshareError;
use crate::core::models::{Expense, Member, Money, Settlement};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// One suggested payment: `from` pays `to` the given amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transfer {
    pub from: Uuid,
    pub to: Uuid,
    #[schema(value_type = String, example = "30.00")]
    pub amount: Money,
}

// Largest magnitude first, member id ascending on ties.
fn by_magnitude(a: &(Uuid, Money), b: &(Uuid, Money)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Greedy debt simplification over remaining balances.
///
/// Debtors and creditors are matched largest-first with two pointers; every
/// step closes out at least one side, so the plan never holds more than
/// `members - 1` transfers and no transfer exceeds what either party still
/// owes or is owed. Members within 0.01 of zero take part in nothing.
pub fn plan_transfers(balances: &BTreeMap<Uuid, Money>) -> Vec<Transfer> {
    debug!("Planning transfers for {} balances", balances.len());

    let mut debtors: Vec<(Uuid, Money)> = balances
        .iter()
        .filter(|(_, bal)| **bal < -SPLIT_TOLERANCE)
        .map(|(&member, &bal)| (member, -bal))
        .collect();
    let mut creditors: Vec<(Uuid, Money)> = balances
        .iter()
        .filter(|(_, bal)| **bal > SPLIT_TOLERANCE)
        .map(|(&member, &bal)| (member, bal))
        .collect();

    debtors.sort_by(by_magnitude);
    creditors.sort_by(by_magnitude);

    let mut transfers = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let (debtor_id, debt) = debtors[i];
        let (creditor_id, credit) = creditors[j];
        let amount = debt.min(credit);

        transfers.push(Transfer {
            from: debtor_id,
            to: creditor_id,
            amount,
        });

        debtors[i].1 = debt - amount;
        creditors[j].1 = credit - amount;

        if debtors[i].1 < SPLIT_TOLERANCE {
            i += 1;
        }
        if creditors[j].1 < SPLIT_TOLERANCE {
            j += 1;
        }
    }

    debug!("Planned {} transfers", transfers.len());
    transfers
}

/// Who still owes whom in a group, after recorded settlements.
pub fn debt_tree(
    members: &[Member],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<Vec<Transfer>, FairshareError> {
    let remaining = remaining_balances(members, expenses, settlements)?;
    Ok(plan_transfers(&remaining))
}
