use super::{expense, member, settlement};
use crate::core::errors::FairshareError;
use crate::core::ledger::{
    compute_balances, debt_tree, equal_split, plan_transfers, reconcile_splits, remaining_balances,
};
use crate::core::models::{ExpenseStatus, Money, Split};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use uuid::Uuid;

fn split(member_id: Uuid, amount: Money) -> Split {
    Split { member_id, amount }
}

#[test]
fn test_equal_split_three_ways() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b, c) = (member(g, "A"), member(g, "B"), member(g, "C"));
    let members = vec![a.clone(), b.clone(), c.clone()];
    let expenses = vec![expense(
        g,
        a.id,
        dec!(90),
        vec![split(a.id, dec!(30)), split(b.id, dec!(30)), split(c.id, dec!(30))],
    )];

    let balances = compute_balances(&members, &expenses, &[]).unwrap();
    assert_eq!(balances[&a.id].balance, dec!(60));
    assert_eq!(balances[&b.id].balance, dec!(-30));
    assert_eq!(balances[&c.id].balance, dec!(-30));
    assert_eq!(balances[&a.id].total_paid, dec!(90));
    assert_eq!(balances[&a.id].total_owed, dec!(30));

    let mut transfers = debt_tree(&members, &expenses, &[]).unwrap();
    assert_eq!(transfers.len(), 2);
    transfers.sort_by_key(|t| t.from);
    let mut debtors = vec![b.id, c.id];
    debtors.sort();
    for (transfer, debtor) in transfers.iter().zip(debtors) {
        assert_eq!(transfer.from, debtor);
        assert_eq!(transfer.to, a.id);
        assert_eq!(transfer.amount, dec!(30));
    }
}

#[test]
fn test_zero_balances_produce_empty_tree() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let members = vec![a.clone(), b.clone()];
    let expenses = vec![
        expense(g, a.id, dec!(20), vec![split(a.id, dec!(10)), split(b.id, dec!(10))]),
        expense(g, b.id, dec!(20), vec![split(a.id, dec!(10)), split(b.id, dec!(10))]),
    ];

    let balances = compute_balances(&members, &expenses, &[]).unwrap();
    assert!(balances.values().all(|b| b.balance.is_zero()));
    assert!(debt_tree(&members, &expenses, &[]).unwrap().is_empty());
}

#[test]
fn test_deleted_expense_is_ignored() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let members = vec![a.clone(), b.clone()];
    let mut deleted = expense(g, a.id, dec!(50), vec![split(b.id, dec!(50))]);
    deleted.status = ExpenseStatus::Deleted;

    let balances = compute_balances(&members, &[deleted.clone()], &[]).unwrap();
    assert!(balances.values().all(|b| b.balance.is_zero()));
    assert!(debt_tree(&members, &[deleted], &[]).unwrap().is_empty());
}

#[test]
fn test_settlement_reduces_remaining_debt() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b, c) = (member(g, "A"), member(g, "B"), member(g, "C"));
    let members = vec![a.clone(), b.clone(), c.clone()];
    let expenses = vec![expense(
        g,
        a.id,
        dec!(90),
        vec![split(a.id, dec!(30)), split(b.id, dec!(30)), split(c.id, dec!(30))],
    )];
    let settlements = vec![settlement(g, b.id, a.id, dec!(30))];

    let remaining = remaining_balances(&members, &expenses, &settlements).unwrap();
    assert_eq!(remaining[&a.id], dec!(30));
    assert_eq!(remaining[&b.id], dec!(0));
    assert_eq!(remaining[&c.id], dec!(-30));

    let transfers = debt_tree(&members, &expenses, &settlements).unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].from, c.id);
    assert_eq!(transfers[0].to, a.id);
    assert_eq!(transfers[0].amount, dec!(30));

    let balances = compute_balances(&members, &expenses, &settlements).unwrap();
    assert_eq!(balances[&a.id].settlements_received, dec!(30));
    assert_eq!(balances[&b.id].settlements_paid, dec!(30));
    let sum: Money = balances.values().map(|b| b.balance).sum();
    assert_eq!(sum, Decimal::ZERO);
}

#[test]
fn test_overpayment_flips_direction() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let members = vec![a.clone(), b.clone()];
    let expenses = vec![expense(g, a.id, dec!(20), vec![split(b.id, dec!(20))])];
    let settlements = vec![settlement(g, b.id, a.id, dec!(25))];

    let transfers = debt_tree(&members, &expenses, &settlements).unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].from, a.id);
    assert_eq!(transfers[0].to, b.id);
    assert_eq!(transfers[0].amount, dec!(5));
}

#[test]
fn test_transfers_close_every_balance() {
    let _ = env_logger::try_init();
    let ids: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();
    let amounts = [dec!(120.50), dec!(-40.25), dec!(-80.25), dec!(35), dec!(-20), dec!(-15)];
    let balances: BTreeMap<Uuid, Money> = ids.iter().copied().zip(amounts).collect();

    let transfers = plan_transfers(&balances);
    assert!(transfers.len() <= ids.len() - 1);

    let mut after = balances.clone();
    for t in &transfers {
        assert!(t.amount > Decimal::ZERO);
        *after.get_mut(&t.from).unwrap() += t.amount;
        *after.get_mut(&t.to).unwrap() -= t.amount;
    }
    assert!(after.values().all(|b| b.abs() < dec!(0.01)));
}

#[test]
fn test_transfers_ignore_sub_cent_balances() {
    let _ = env_logger::try_init();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let balances: BTreeMap<Uuid, Money> = [(a, dec!(0.005)), (b, dec!(-0.005))].into_iter().collect();
    assert!(plan_transfers(&balances).is_empty());
}

#[test]
fn test_tied_balances_are_ordered_by_member_id() {
    let _ = env_logger::try_init();
    let mut ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    ids.sort();
    let balances: BTreeMap<Uuid, Money> = [
        (ids[0], dec!(-10)),
        (ids[1], dec!(10)),
        (ids[2], dec!(-10)),
        (ids[3], dec!(10)),
    ]
    .into_iter()
    .collect();

    let first = plan_transfers(&balances);
    let second = plan_transfers(&balances);
    assert_eq!(first, second);
    assert_eq!(first[0].from, ids[0]);
    assert_eq!(first[0].to, ids[1]);
    assert_eq!(first[1].from, ids[2]);
    assert_eq!(first[1].to, ids[3]);
}

#[test]
fn test_thousand_small_expenses_stay_exact() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b, c) = (member(g, "A"), member(g, "B"), member(g, "C"));
    let members = vec![a.clone(), b.clone(), c.clone()];
    let roster = [a.id, b.id, c.id];

    let expenses: Vec<_> = (0..1000)
        .map(|i| {
            let payer = roster[i % 3];
            expense(g, payer, dec!(0.10), equal_split(dec!(0.10), &roster).unwrap())
        })
        .collect();

    let balances = compute_balances(&members, &expenses, &[]).unwrap();
    let sum: Money = balances.values().map(|b| b.balance).sum();
    assert_eq!(sum, Decimal::ZERO);

    let transfers = debt_tree(&members, &expenses, &[]).unwrap();
    assert!(transfers.len() <= 2);
}

#[test]
fn test_equal_split_rounding() {
    let _ = env_logger::try_init();
    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    let splits = equal_split(dec!(100), &ids).unwrap();

    let amounts: Vec<Money> = splits.iter().map(|s| s.amount).collect();
    assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    assert_eq!(splits.iter().map(|s| s.amount).sum::<Money>(), dec!(100));
}

#[test]
fn test_equal_split_rejects_bad_input() {
    let _ = env_logger::try_init();
    assert!(matches!(equal_split(dec!(10), &[]), Err(FairshareError::InvalidSplit)));
    assert!(matches!(
        equal_split(dec!(0), &[Uuid::new_v4()]),
        Err(FairshareError::InvalidAmount(_, _))
    ));
}

#[test]
fn test_split_sum_mismatch_is_rejected() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let expenses = vec![expense(g, a.id, dec!(100), vec![split(a.id, dec!(50)), split(b.id, dec!(49))])];

    let result = compute_balances(&[a, b], &expenses, &[]);
    assert!(matches!(result, Err(FairshareError::SplitSumMismatch { .. })));
}

#[test]
fn test_split_within_tolerance_is_accepted() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let expenses = vec![expense(g, a.id, dec!(100), vec![split(a.id, dec!(50)), split(b.id, dec!(49.99))])];

    assert!(compute_balances(&[a, b], &expenses, &[]).is_ok());
}

#[test]
fn test_sub_cent_split_is_rejected() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let expenses = vec![expense(g, a.id, dec!(100), vec![split(a.id, dec!(50)), split(b.id, dec!(49.995))])];

    let result = compute_balances(&[a, b], &expenses, &[]);
    assert!(matches!(result, Err(FairshareError::InvalidAmount(_, amount)) if amount == dec!(49.995)));

    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    assert!(matches!(equal_split(dec!(1.005), &ids), Err(FairshareError::InvalidAmount(_, _))));
}

#[test]
fn test_reconcile_folds_remainder_into_largest_share() {
    let _ = env_logger::try_init();
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let short = reconcile_splits(dec!(100), vec![split(a, dec!(30)), split(b, dec!(40)), split(c, dec!(29.99))]);
    assert_eq!(short[1].amount, dec!(40.01));
    assert_eq!(short.iter().map(|s| s.amount).sum::<Money>(), dec!(100));

    let over = reconcile_splits(dec!(10), vec![split(a, dec!(5)), split(b, dec!(5.01))]);
    assert_eq!(over[1].amount, dec!(5));
    assert_eq!(over[0].amount, dec!(5));

    // ties go to the first share
    let tied = reconcile_splits(dec!(0.01), vec![split(a, dec!(0)), split(b, dec!(0))]);
    assert_eq!(tied[0].amount, dec!(0.01));
    assert_eq!(tied[1].amount, dec!(0));

    let exact = vec![split(a, dec!(3)), split(b, dec!(7))];
    assert_eq!(reconcile_splits(dec!(10), exact.clone()), exact);
}

#[test]
fn test_split_for_non_member_is_rejected() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let a = member(g, "A");
    let stranger = Uuid::new_v4();
    let expenses = vec![expense(g, a.id, dec!(10), vec![split(stranger, dec!(10))])];

    let result = compute_balances(&[a], &expenses, &[]);
    assert!(matches!(result, Err(FairshareError::InvalidSplitUser(_))));
}

#[test]
fn test_invalid_settlements_are_rejected() {
    let _ = env_logger::try_init();
    let g = Uuid::new_v4();
    let (a, b) = (member(g, "A"), member(g, "B"));
    let members = vec![a.clone(), b.clone()];

    let to_self = vec![settlement(g, a.id, a.id, dec!(5))];
    assert!(matches!(
        remaining_balances(&members, &[], &to_self),
        Err(FairshareError::SelfSettlement)
    ));

    let outsider = vec![settlement(g, a.id, Uuid::new_v4(), dec!(5))];
    assert!(matches!(
        remaining_balances(&members, &[], &outsider),
        Err(FairshareError::UnknownMember(_))
    ));

    let zero = vec![settlement(g, a.id, b.id, Decimal::ZERO)];
    assert!(matches!(
        compute_balances(&members, &[], &zero),
        Err(FairshareError::InvalidAmount(_, _))
    ));
}
