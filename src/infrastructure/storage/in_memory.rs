use crate::core::errors::FairshareError;
use crate::core::models::{ActivityLog, Expense, Group, Income, Member, MembershipStatus, PersonalExpense, Settlement};
use crate::infrastructure::storage::{GroupSnapshot, Storage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    groups: HashMap<Uuid, Group>,
    members: HashMap<Uuid, Member>,
    expenses: HashMap<Uuid, Expense>,
    settlements: HashMap<Uuid, Settlement>,
    activities: HashMap<Uuid, Vec<ActivityLog>>, // group_id -> entries
    personal_expenses: HashMap<Uuid, PersonalExpense>,
    incomes: HashMap<Uuid, Income>,
}

impl State {
    fn require_group(&self, group_id: Uuid) -> Result<(), FairshareError> {
        if self.groups.contains_key(&group_id) {
            Ok(())
        } else {
            Err(FairshareError::GroupNotFound(group_id.to_string()))
        }
    }

    fn push_activity(&mut self, activity: ActivityLog) {
        self.activities.entry(activity.group_id).or_default().push(activity);
    }
}

/// All tables behind one lock, so a snapshot or a multi-row write is atomic.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<State>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_group(&self, group: Group, admin: Member, activity: ActivityLog) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        state.members.insert(admin.id, admin);
        state.groups.insert(group.id, group);
        state.push_activity(activity);
        Ok(())
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, FairshareError> {
        Ok(self.state.read().await.groups.get(&group_id).cloned())
    }

    async fn delete_group(&self, group_id: Uuid) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        if state.groups.remove(&group_id).is_none() {
            return Err(FairshareError::GroupNotFound(group_id.to_string()));
        }
        state.members.retain(|_, m| m.group_id != group_id);
        state.expenses.retain(|_, e| e.group_id != group_id);
        state.settlements.retain(|_, s| s.group_id != group_id);
        state.activities.remove(&group_id);
        Ok(())
    }

    async fn insert_member_if_absent(&self, member: Member, activity: ActivityLog) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        state.require_group(member.group_id)?;
        if state
            .members
            .values()
            .any(|m| m.group_id == member.group_id && m.user_id == member.user_id)
        {
            return Err(FairshareError::AlreadyGroupMember(member.user_id));
        }
        state.members.insert(member.id, member);
        state.push_activity(activity);
        Ok(())
    }

    async fn activate_member(&self, member_id: Uuid, activity: ActivityLog) -> Result<Member, FairshareError> {
        let mut state = self.state.write().await;
        let member = state
            .members
            .get_mut(&member_id)
            .ok_or_else(|| FairshareError::MemberNotFound(member_id.to_string()))?;
        if member.is_active() {
            return Err(FairshareError::InvitationAlreadyAccepted(member_id.to_string()));
        }
        member.status = MembershipStatus::Active;
        member.joined_at = activity.created_at;
        let member = member.clone();
        state.push_activity(activity);
        Ok(member)
    }

    async fn get_member(&self, member_id: Uuid) -> Result<Option<Member>, FairshareError> {
        Ok(self.state.read().await.members.get(&member_id).cloned())
    }

    async fn find_member_by_user(&self, group_id: Uuid, user_id: &str) -> Result<Option<Member>, FairshareError> {
        Ok(self
            .state
            .read()
            .await
            .members
            .values()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }

    async fn get_members(&self, group_id: Uuid) -> Result<Vec<Member>, FairshareError> {
        let state = self.state.read().await;
        let mut members: Vec<Member> = state
            .members
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn insert_expense(&self, expense: Expense, activity: ActivityLog) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        state.require_group(expense.group_id)?;
        state.expenses.insert(expense.id, expense);
        state.push_activity(activity);
        Ok(())
    }

    async fn update_active_expense(&self, expense: Expense, activity: ActivityLog) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        match state.expenses.get(&expense.id) {
            Some(current) if current.is_active() && current.group_id == expense.group_id => {}
            _ => return Err(FairshareError::ExpenseNotFound(expense.id.to_string())),
        }
        state.expenses.insert(expense.id, expense);
        state.push_activity(activity);
        Ok(())
    }

    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, FairshareError> {
        Ok(self.state.read().await.expenses.get(&expense_id).cloned())
    }

    async fn get_active_expenses(&self, group_id: Uuid) -> Result<Vec<Expense>, FairshareError> {
        let state = self.state.read().await;
        Ok(active_expenses(&state, group_id))
    }

    async fn save_settlement(&self, settlement: Settlement, activity: ActivityLog) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        state.require_group(settlement.group_id)?;
        state.settlements.insert(settlement.id, settlement);
        state.push_activity(activity);
        Ok(())
    }

    async fn get_settlements(&self, group_id: Uuid) -> Result<Vec<Settlement>, FairshareError> {
        let state = self.state.read().await;
        Ok(group_settlements(&state, group_id))
    }

    async fn group_snapshot(&self, group_id: Uuid) -> Result<Option<GroupSnapshot>, FairshareError> {
        let state = self.state.read().await;
        let Some(group) = state.groups.get(&group_id).cloned() else {
            return Ok(None);
        };
        let mut members: Vec<Member> = state
            .members
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);

        Ok(Some(GroupSnapshot {
            group,
            members,
            expenses: active_expenses(&state, group_id),
            settlements: group_settlements(&state, group_id),
        }))
    }

    async fn get_activities(&self, group_id: Uuid, limit: usize) -> Result<Vec<ActivityLog>, FairshareError> {
        let state = self.state.read().await;
        Ok(state
            .activities
            .get(&group_id)
            .map(|entries| entries.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn save_personal_expense(&self, expense: PersonalExpense) -> Result<(), FairshareError> {
        self.state.write().await.personal_expenses.insert(expense.id, expense);
        Ok(())
    }

    async fn get_personal_expense(&self, expense_id: Uuid) -> Result<Option<PersonalExpense>, FairshareError> {
        Ok(self.state.read().await.personal_expenses.get(&expense_id).cloned())
    }

    async fn get_personal_expenses(&self, user_id: &str) -> Result<Vec<PersonalExpense>, FairshareError> {
        let state = self.state.read().await;
        Ok(owned_rows(&state.personal_expenses, user_id, |e| &e.user_id))
    }

    async fn update_personal_expense(&self, expense: PersonalExpense) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        replace_owned(&mut state.personal_expenses, expense.id, expense, |e| &e.user_id)
    }

    async fn delete_personal_expenses(&self, user_id: &str, ids: &[Uuid]) -> Result<usize, FairshareError> {
        let mut state = self.state.write().await;
        Ok(delete_owned(&mut state.personal_expenses, user_id, ids, |e| &e.user_id))
    }

    async fn save_income(&self, income: Income) -> Result<(), FairshareError> {
        self.state.write().await.incomes.insert(income.id, income);
        Ok(())
    }

    async fn get_income(&self, income_id: Uuid) -> Result<Option<Income>, FairshareError> {
        Ok(self.state.read().await.incomes.get(&income_id).cloned())
    }

    async fn get_incomes(&self, user_id: &str) -> Result<Vec<Income>, FairshareError> {
        let state = self.state.read().await;
        Ok(owned_rows(&state.incomes, user_id, |i| &i.user_id))
    }

    async fn update_income(&self, income: Income) -> Result<(), FairshareError> {
        let mut state = self.state.write().await;
        replace_owned(&mut state.incomes, income.id, income, |i| &i.user_id)
    }

    async fn delete_incomes(&self, user_id: &str, ids: &[Uuid]) -> Result<usize, FairshareError> {
        let mut state = self.state.write().await;
        Ok(delete_owned(&mut state.incomes, user_id, ids, |i| &i.user_id))
    }
}

fn active_expenses(state: &State, group_id: Uuid) -> Vec<Expense> {
    let mut expenses: Vec<Expense> = state
        .expenses
        .values()
        .filter(|e| e.group_id == group_id && e.is_active())
        .cloned()
        .collect();
    expenses.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));
    expenses
}

fn group_settlements(state: &State, group_id: Uuid) -> Vec<Settlement> {
    let mut settlements: Vec<Settlement> = state
        .settlements
        .values()
        .filter(|s| s.group_id == group_id)
        .cloned()
        .collect();
    settlements.sort_by_key(|s| s.created_at);
    settlements
}

fn owned_rows<T: Clone>(table: &HashMap<Uuid, T>, user_id: &str, owner: impl Fn(&T) -> &String) -> Vec<T> {
    table.values().filter(|row| owner(*row) == user_id).cloned().collect()
}

/// Overwrites a personal row only if it still exists under the same owner.
fn replace_owned<T>(
    table: &mut HashMap<Uuid, T>,
    id: Uuid,
    row: T,
    owner: impl Fn(&T) -> &String,
) -> Result<(), FairshareError> {
    let current_owner = table.get(&id).map(|current| owner(current).clone());
    match current_owner {
        None => Err(FairshareError::RecordNotFound(id.to_string())),
        Some(current_owner) if &current_owner != owner(&row) => {
            Err(FairshareError::NotRecordOwner(owner(&row).clone()))
        }
        Some(_) => {
            table.insert(id, row);
            Ok(())
        }
    }
}

fn delete_owned<T>(table: &mut HashMap<Uuid, T>, user_id: &str, ids: &[Uuid], owner: impl Fn(&T) -> &String) -> usize {
    let before = table.len();
    table.retain(|id, row| !(ids.contains(id) && owner(&*row) == user_id));
    before - table.len()
}
