use crate::core::errors::FairshareError;
use crate::core::models::{Money, Split};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use uuid::Uuid;

const CENT: Decimal = dec!(0.01);

/// Divides `amount` evenly across `member_ids` in whole cents.
///
/// Leftover cents go one at a time to the first members in the given order,
/// so the shares always add up to `amount` exactly.
pub fn equal_split(amount: Money, member_ids: &[Uuid]) -> Result<Vec<Split>, FairshareError> {
    if member_ids.is_empty() {
        return Err(FairshareError::InvalidSplit);
    }
    if amount <= Decimal::ZERO || !is_whole_cents(amount) {
        return Err(FairshareError::InvalidAmount("amount".to_string(), amount));
    }

    let count = Decimal::from(member_ids.len() as u64);
    let share = (amount / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut leftover = amount - share * count;

    let splits: Vec<Split> = member_ids
        .iter()
        .map(|&member_id| {
            let mut owed = share;
            if leftover >= CENT {
                owed += CENT;
                leftover -= CENT;
            }
            Split {
                member_id,
                amount: owed,
            }
        })
        .collect();

    Ok(splits)
}

pub(crate) fn is_whole_cents(amount: Money) -> bool {
    amount.normalize().scale() <= 2
}

/// Makes already validated shares add up to `amount` exactly.
///
/// Validation accepts a total within 0.01 of the amount; the difference is
/// folded into the largest share (first one on ties) so no remainder is left
/// in the group.
pub fn reconcile_splits(amount: Money, mut splits: Vec<Split>) -> Vec<Split> {
    let total: Money = splits.iter().map(|s| s.amount).sum();
    let remainder = amount - total;
    if remainder.is_zero() {
        return splits;
    }

    let largest = splits
        .iter()
        .enumerate()
        .fold(None::<(usize, Money)>, |best, (i, s)| match best {
            Some((_, max)) if s.amount <= max => best,
            _ => Some((i, s.amount)),
        });
    if let Some((i, _)) = largest {
        splits[i].amount += remainder;
    }
    splits
}
