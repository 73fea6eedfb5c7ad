mod config_tests;
mod insight_tests;
mod ledger_tests;

use crate::core::models::{Expense, ExpenseStatus, Member, MembershipStatus, Money, Role, Settlement, Split};
use crate::core::services::FairshareService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

pub fn create_test_service() -> FairshareService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    FairshareService::new(storage, logging)
}

/// Group owned by "alice" with "bob" and "carol" as accepted members.
pub async fn create_three_member_group(
    service: &FairshareService<InMemoryLogging, InMemoryStorage>,
) -> (Uuid, Member, Member, Member) {
    let (group, alice) = service
        .create_group("Trip".to_string(), "alice", "Alice".to_string())
        .await
        .unwrap();
    let bob = service
        .invite_member(group.id, "bob", "Bob".to_string(), "alice")
        .await
        .unwrap();
    let bob = service.accept_invitation(bob.id, "bob").await.unwrap();
    let carol = service
        .invite_member(group.id, "carol", "Carol".to_string(), "alice")
        .await
        .unwrap();
    let carol = service.accept_invitation(carol.id, "carol").await.unwrap();
    (group.id, alice, bob, carol)
}

pub fn member(group_id: Uuid, name: &str) -> Member {
    Member {
        id: Uuid::new_v4(),
        group_id,
        user_id: name.to_lowercase(),
        name: name.to_string(),
        role: Role::Member,
        status: MembershipStatus::Active,
        joined_at: Utc::now(),
    }
}

pub fn expense(group_id: Uuid, paid_by: Uuid, amount: Money, splits: Vec<Split>) -> Expense {
    let now = Utc::now();
    Expense {
        id: Uuid::new_v4(),
        group_id,
        paid_by,
        amount,
        category: "Food".to_string(),
        description: "Dinner".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        status: ExpenseStatus::Active,
        splits,
        created_at: now,
        updated_at: now,
    }
}

pub fn settlement(group_id: Uuid, from: Uuid, to: Uuid, amount: Money) -> Settlement {
    Settlement {
        id: Uuid::new_v4(),
        group_id,
        from_member_id: from,
        to_member_id: to,
        amount,
        created_at: Utc::now(),
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
