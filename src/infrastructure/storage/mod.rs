use crate::core::errors::FairshareError;
use crate::core::models::{ActivityLog, Expense, Group, Income, Member, PersonalExpense, Settlement};
use async_trait::async_trait;
use uuid::Uuid;

/// One consistent read of everything the ledger needs for a group.
#[derive(Clone, Debug)]
pub struct GroupSnapshot {
    pub group: Group,
    pub members: Vec<Member>,
    /// Active expenses only.
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

/// Persistence seam. Every mutating call that takes an `ActivityLog` commits
/// the row and its activity entry together.
///
/// Conditional writes (`insert_member_if_absent`, `activate_member`,
/// `update_active_expense`, the personal `update_*` calls) re-check their
/// precondition at write time and fail without writing when it no longer holds.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_group(&self, group: Group, admin: Member, activity: ActivityLog) -> Result<(), FairshareError>;
    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, FairshareError>;
    async fn delete_group(&self, group_id: Uuid) -> Result<(), FairshareError>;

    /// Fails with `AlreadyGroupMember` when the user already holds any
    /// membership in the group.
    async fn insert_member_if_absent(&self, member: Member, activity: ActivityLog) -> Result<(), FairshareError>;
    /// Flips a pending membership to active. Fails with
    /// `InvitationAlreadyAccepted` when it is already active.
    async fn activate_member(&self, member_id: Uuid, activity: ActivityLog) -> Result<Member, FairshareError>;
    async fn get_member(&self, member_id: Uuid) -> Result<Option<Member>, FairshareError>;
    async fn find_member_by_user(&self, group_id: Uuid, user_id: &str) -> Result<Option<Member>, FairshareError>;
    async fn get_members(&self, group_id: Uuid) -> Result<Vec<Member>, FairshareError>;

    async fn insert_expense(&self, expense: Expense, activity: ActivityLog) -> Result<(), FairshareError>;
    /// Replaces an expense, split set included, only while the stored row is
    /// still active in the same group; otherwise `ExpenseNotFound`.
    async fn update_active_expense(&self, expense: Expense, activity: ActivityLog) -> Result<(), FairshareError>;
    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, FairshareError>;
    async fn get_active_expenses(&self, group_id: Uuid) -> Result<Vec<Expense>, FairshareError>;

    async fn save_settlement(&self, settlement: Settlement, activity: ActivityLog) -> Result<(), FairshareError>;
    async fn get_settlements(&self, group_id: Uuid) -> Result<Vec<Settlement>, FairshareError>;

    async fn group_snapshot(&self, group_id: Uuid) -> Result<Option<GroupSnapshot>, FairshareError>;

    async fn get_activities(&self, group_id: Uuid, limit: usize) -> Result<Vec<ActivityLog>, FairshareError>;

    async fn save_personal_expense(&self, expense: PersonalExpense) -> Result<(), FairshareError>;
    async fn get_personal_expense(&self, expense_id: Uuid) -> Result<Option<PersonalExpense>, FairshareError>;
    async fn get_personal_expenses(&self, user_id: &str) -> Result<Vec<PersonalExpense>, FairshareError>;
    async fn update_personal_expense(&self, expense: PersonalExpense) -> Result<(), FairshareError>;
    /// Deletes the listed rows the user owns and returns how many went.
    async fn delete_personal_expenses(&self, user_id: &str, ids: &[Uuid]) -> Result<usize, FairshareError>;

    async fn save_income(&self, income: Income) -> Result<(), FairshareError>;
    async fn get_income(&self, income_id: Uuid) -> Result<Option<Income>, FairshareError>;
    async fn get_incomes(&self, user_id: &str) -> Result<Vec<Income>, FairshareError>;
    async fn update_income(&self, income: Income) -> Result<(), FairshareError>;
    async fn delete_incomes(&self, user_id: &str, ids: &[Uuid]) -> Result<usize, FairshareError>;
}

pub mod in_memory;
