use crate::core::constants::{
    ACTIVITY_PAGE_SIZE, BALANCES_QUERIED, DEBT_TREE_QUERIED, DEFAULT_MONTHLY_BUDGET, EXPENSE_ADDED, EXPENSE_DELETED,
    EXPENSE_EDITED, GROUP_CREATED, GROUP_DELETED, INCOME_ADDED, INCOME_EDITED, INCOMES_DELETED, INSIGHTS_GENERATED,
    MEMBER_INVITED, MEMBER_JOINED, PERSONAL_EXPENSE_ADDED, PERSONAL_EXPENSE_EDITED, PERSONAL_EXPENSES_DELETED,
    SETTLEMENT_RECORDED,
};
use crate::core::errors::{FairshareError, FieldError};
use crate::core::ledger::{self, MemberBalance};
use crate::core::models::{
    ActivityAction, ActivityLog, AppLog, EntityType, Expense, ExpenseStatus, Group, Income, IncomeUpdate, Member,
    MembershipStatus, Money, NewExpense, NewIncome, NewPersonalExpense, PersonalExpense, PersonalExpenseUpdate, Role,
    Settlement, Split, SplitMode,
};
use crate::core::reports::{self, MonthlyBreakdown, PersonalStats};
use crate::core::signals::{self, InsightContext, InsightReport, SignalPolicy};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::{GroupSnapshot, Storage};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_CATEGORY: &str = "Other";
const MAX_AMOUNT: Decimal = dec!(1_000_000);

/// A member's balance together with who the member is.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberBalanceView {
    pub user_id: String,
    pub name: String,
    #[serde(flatten)]
    pub balance: MemberBalance,
}

/// One suggested payment with both parties' display names.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DebtTreeEntry {
    pub from_member_id: Uuid,
    pub from_member_name: String,
    pub to_member_id: Uuid,
    pub to_member_name: String,
    #[schema(value_type = String)]
    pub amount: Money,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupSummary {
    pub group: Group,
    #[schema(value_type = String)]
    pub total_spend: Money,
    pub expense_count: usize,
    pub members: Vec<MemberBalanceView>,
    /// Balance of the member asking for the summary.
    #[schema(value_type = String)]
    pub user_balance: Money,
}

pub struct FairshareService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    policy: SignalPolicy,
    budgets: HashMap<String, f64>,
    monthly_budget_limit: Money,
}

impl<L: LoggingService, S: Storage> FairshareService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        info!("Initializing FairshareService");
        FairshareService {
            storage,
            logging,
            policy: SignalPolicy::default(),
            budgets: signals::default_category_budgets(),
            monthly_budget_limit: DEFAULT_MONTHLY_BUDGET,
        }
    }

    /// Replaces the signal thresholds and category budgets used by `insights`.
    pub fn with_insight_settings(mut self, policy: SignalPolicy, budgets: HashMap<String, f64>) -> Self {
        self.policy = policy;
        self.budgets = budgets;
        self
    }

    /// Overall monthly spending limit reported by `personal_stats`.
    pub fn with_monthly_budget(mut self, limit: Money) -> Self {
        self.monthly_budget_limit = limit;
        self
    }

    // VALIDATION HELPERS

    async fn require_group(&self, group_id: Uuid) -> Result<Group, FairshareError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| FairshareError::GroupNotFound(group_id.to_string()))
    }

    /// The acting user's active membership in the group.
    async fn validate_group_membership(&self, group_id: Uuid, user_id: &str) -> Result<Member, FairshareError> {
        self.require_group(group_id).await?;
        match self.storage.find_member_by_user(group_id, user_id).await? {
            Some(member) if member.is_active() => Ok(member),
            _ => {
                warn!("User {} is not an active member of group {}", user_id, group_id);
                Err(FairshareError::NotGroupMember(user_id.to_string()))
            }
        }
    }

    async fn validate_group_admin(&self, group_id: Uuid, user_id: &str) -> Result<Member, FairshareError> {
        let member = self.validate_group_membership(group_id, user_id).await?;
        if !member.is_admin() {
            warn!("User {} attempted an admin action on group {}", user_id, group_id);
            return Err(FairshareError::NotGroupAdmin(user_id.to_string()));
        }
        Ok(member)
    }

    async fn log(&self, action: &str, details: serde_json::Value, user_id: &str) -> Result<(), FairshareError> {
        self.logging.log_action(action, details, Some(user_id)).await
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), FairshareError> {
        if value.trim().is_empty() {
            return Err(FairshareError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.chars().count() > max_length {
            return Err(FairshareError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(FairshareError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: Money) -> Result<(), FairshareError> {
        if amount <= Decimal::ZERO {
            return Err(FairshareError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount must be greater than 0".to_string(),
                },
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(FairshareError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Amount Too Large".to_string(),
                    description: "Amount cannot exceed 1,000,000".to_string(),
                },
            ));
        }
        if amount.normalize().scale() > 2 {
            return Err(FairshareError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: "Invalid Amount".to_string(),
                    description: "Amount cannot have more than 2 decimal places".to_string(),
                },
            ));
        }
        Ok(())
    }

    /// Turns the requested split mode into concrete shares, checks them
    /// against the amount and the group roster, then absorbs any accepted
    /// sub-tolerance difference so the shares sum to the amount exactly.
    fn resolve_splits(&self, input: &NewExpense, members: &[Member]) -> Result<Vec<Split>, FairshareError> {
        let member_ids: HashSet<Uuid> = members.iter().map(|m| m.id).collect();
        if !member_ids.contains(&input.paid_by) {
            warn!("Payer {} is not a member of the group", input.paid_by);
            return Err(FairshareError::UnknownMember(input.paid_by.to_string()));
        }

        let splits = match &input.split {
            SplitMode::Equal(ids) => ledger::equal_split(input.amount, ids)?,
            SplitMode::Custom(splits) => splits.clone(),
        };
        ledger::validate_splits(input.amount, &splits, &member_ids)?;
        Ok(ledger::reconcile_splits(input.amount, splits))
    }

    fn activity(
        group_id: Uuid,
        action: ActivityAction,
        entity_type: EntityType,
        entity_id: Uuid,
        user_id: &str,
        details: String,
    ) -> ActivityLog {
        ActivityLog {
            id: Uuid::new_v4(),
            group_id,
            action,
            entity_type,
            entity_id,
            user_id: user_id.to_string(),
            details,
            created_at: Utc::now(),
        }
    }

    fn acting_member<'a>(snapshot: &'a GroupSnapshot, user_id: &str) -> Result<&'a Member, FairshareError> {
        snapshot
            .members
            .iter()
            .find(|m| m.user_id == user_id && m.is_active())
            .ok_or_else(|| FairshareError::NotGroupMember(user_id.to_string()))
    }

    async fn snapshot(&self, group_id: Uuid) -> Result<GroupSnapshot, FairshareError> {
        self.storage
            .group_snapshot(group_id)
            .await?
            .ok_or_else(|| FairshareError::GroupNotFound(group_id.to_string()))
    }

    fn name_of(members: &[Member], member_id: Uuid) -> String {
        members
            .iter()
            .find(|m| m.id == member_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    // GROUP MANAGEMENT

    pub async fn create_group(
        &self,
        name: String,
        creator_user_id: &str,
        creator_name: String,
    ) -> Result<(Group, Member), FairshareError> {
        info!("Creating group '{}' for user {}", name, creator_user_id);
        self.validate_string_input("name", &name, 100)?;
        self.validate_string_input("member name", &creator_name, 100)?;

        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4(),
            name,
            created_by: creator_user_id.to_string(),
            created_at: now,
        };
        let admin = Member {
            id: Uuid::new_v4(),
            group_id: group.id,
            user_id: creator_user_id.to_string(),
            name: creator_name,
            role: Role::Admin,
            status: MembershipStatus::Active,
            joined_at: now,
        };
        let activity = Self::activity(
            group.id,
            ActivityAction::Created,
            EntityType::Group,
            group.id,
            creator_user_id,
            format!("{} created group \"{}\"", admin.name, group.name),
        );

        self.storage.create_group(group.clone(), admin.clone(), activity).await?;
        debug!("Group created with ID: {}", group.id);

        self.log(
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "admin_member_id": admin.id }),
            creator_user_id,
        )
        .await?;

        Ok((group, admin))
    }

    pub async fn delete_group(&self, group_id: Uuid, deleted_by: &str) -> Result<(), FairshareError> {
        info!("Deleting group {} by user {}", group_id, deleted_by);
        self.validate_group_admin(group_id, deleted_by).await?;
        self.storage.delete_group(group_id).await?;

        self.log(GROUP_DELETED, json!({ "group_id": group_id }), deleted_by).await?;
        Ok(())
    }

    /// Adds a pending membership; the invited user must accept it.
    pub async fn invite_member(
        &self,
        group_id: Uuid,
        user_id: &str,
        name: String,
        invited_by: &str,
    ) -> Result<Member, FairshareError> {
        info!("User {} inviting {} to group {}", invited_by, user_id, group_id);
        let inviter = self.validate_group_admin(group_id, invited_by).await?;
        self.validate_string_input("member name", &name, 100)?;

        let member = Member {
            id: Uuid::new_v4(),
            group_id,
            user_id: user_id.to_string(),
            name,
            role: Role::Member,
            status: MembershipStatus::Pending,
            joined_at: Utc::now(),
        };
        let activity = Self::activity(
            group_id,
            ActivityAction::Invited,
            EntityType::Member,
            member.id,
            invited_by,
            format!("{} invited {}", inviter.name, member.name),
        );
        if let Err(e) = self.storage.insert_member_if_absent(member.clone(), activity).await {
            warn!("Invite of {} to group {} rejected: {}", user_id, group_id, e);
            return Err(e);
        }

        self.log(
            MEMBER_INVITED,
            json!({ "group_id": group_id, "member_id": member.id, "user_id": user_id }),
            invited_by,
        )
        .await?;
        Ok(member)
    }

    pub async fn accept_invitation(&self, member_id: Uuid, user_id: &str) -> Result<Member, FairshareError> {
        info!("User {} accepting invitation {}", user_id, member_id);
        let pending = self
            .storage
            .get_member(member_id)
            .await?
            .ok_or_else(|| FairshareError::MemberNotFound(member_id.to_string()))?;

        if pending.user_id != user_id {
            warn!("User {} tried to accept invitation {} for {}", user_id, member_id, pending.user_id);
            return Err(FairshareError::NotGroupMember(user_id.to_string()));
        }

        let activity = Self::activity(
            pending.group_id,
            ActivityAction::Joined,
            EntityType::Member,
            pending.id,
            user_id,
            format!("{} joined the group", pending.name),
        );
        let member = self.storage.activate_member(member_id, activity).await?;

        self.log(
            MEMBER_JOINED,
            json!({ "group_id": member.group_id, "member_id": member.id }),
            user_id,
        )
        .await?;
        Ok(member)
    }

    pub async fn list_members(&self, group_id: Uuid, queried_by: &str) -> Result<Vec<Member>, FairshareError> {
        self.validate_group_membership(group_id, queried_by).await?;
        self.storage.get_members(group_id).await
    }

    // EXPENSE MANAGEMENT

    pub async fn add_expense(
        &self,
        group_id: Uuid,
        input: NewExpense,
        added_by: &str,
    ) -> Result<Expense, FairshareError> {
        info!("Adding expense to group {} by user {} for {}", group_id, added_by, input.amount);
        let actor = self.validate_group_membership(group_id, added_by).await?;
        self.validate_amount_input("amount", input.amount)?;
        self.validate_string_input("description", &input.description, 200)?;

        let members = self.storage.get_members(group_id).await?;
        let splits = self.resolve_splits(&input, &members)?;

        let now = Utc::now();
        let expense = Expense {
            id: Uuid::new_v4(),
            group_id,
            paid_by: input.paid_by,
            amount: input.amount,
            category: input.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            description: input.description,
            date: input.date.unwrap_or_else(|| now.date_naive()),
            status: ExpenseStatus::Active,
            splits,
            created_at: now,
            updated_at: now,
        };

        let payer_name = Self::name_of(&members, expense.paid_by);
        let activity = Self::activity(
            group_id,
            ActivityAction::Created,
            EntityType::Expense,
            expense.id,
            added_by,
            format!(
                "{} added expense \"{}\" - Amount: ${:.2} | Paid by: {} | Split {} {}",
                actor.name,
                expense.description,
                expense.amount,
                payer_name,
                expense.splits.len(),
                if expense.splits.len() == 1 { "way" } else { "ways" }
            ),
        );
        self.storage.insert_expense(expense.clone(), activity).await?;
        debug!("Expense created with ID: {}", expense.id);

        self.log(
            EXPENSE_ADDED,
            json!({ "expense_id": expense.id, "group_id": group_id, "amount": expense.amount }),
            added_by,
        )
        .await?;
        Ok(expense)
    }

    /// Replaces an expense's amount, payer, category, date and its entire
    /// split set.
    pub async fn edit_expense(
        &self,
        group_id: Uuid,
        expense_id: Uuid,
        input: NewExpense,
        edited_by: &str,
    ) -> Result<Expense, FairshareError> {
        info!("Editing expense {} by user {}", expense_id, edited_by);
        let existing = self
            .storage
            .get_expense(expense_id)
            .await?
            .filter(|e| e.is_active() && e.group_id == group_id)
            .ok_or_else(|| FairshareError::ExpenseNotFound(expense_id.to_string()))?;
        let actor = self.validate_group_membership(existing.group_id, edited_by).await?;
        self.validate_amount_input("amount", input.amount)?;
        self.validate_string_input("description", &input.description, 200)?;

        let members = self.storage.get_members(existing.group_id).await?;
        let splits = self.resolve_splits(&input, &members)?;

        let updated = Expense {
            paid_by: input.paid_by,
            amount: input.amount,
            category: input.category.unwrap_or_else(|| existing.category.clone()),
            description: input.description,
            date: input.date.unwrap_or(existing.date),
            splits,
            updated_at: Utc::now(),
            ..existing
        };

        let activity = Self::activity(
            updated.group_id,
            ActivityAction::Updated,
            EntityType::Expense,
            updated.id,
            edited_by,
            format!(
                "{} updated expense \"{}\" - Amount: ${:.2}",
                actor.name, updated.description, updated.amount
            ),
        );
        self.storage.update_active_expense(updated.clone(), activity).await?;

        self.log(
            EXPENSE_EDITED,
            json!({ "expense_id": updated.id, "group_id": updated.group_id, "new_amount": updated.amount }),
            edited_by,
        )
        .await?;
        Ok(updated)
    }

    pub async fn delete_expense(
        &self,
        group_id: Uuid,
        expense_id: Uuid,
        deleted_by: &str,
    ) -> Result<Expense, FairshareError> {
        info!("Deleting expense {} by user {}", expense_id, deleted_by);
        let existing = self
            .storage
            .get_expense(expense_id)
            .await?
            .filter(|e| e.is_active() && e.group_id == group_id)
            .ok_or_else(|| FairshareError::ExpenseNotFound(expense_id.to_string()))?;
        let actor = self.validate_group_membership(existing.group_id, deleted_by).await?;

        let deleted = Expense {
            status: ExpenseStatus::Deleted,
            updated_at: Utc::now(),
            ..existing
        };
        let activity = Self::activity(
            deleted.group_id,
            ActivityAction::Deleted,
            EntityType::Expense,
            deleted.id,
            deleted_by,
            format!("{} deleted expense \"{}\"", actor.name, deleted.description),
        );
        self.storage.update_active_expense(deleted.clone(), activity).await?;

        self.log(
            EXPENSE_DELETED,
            json!({ "expense_id": deleted.id, "group_id": deleted.group_id }),
            deleted_by,
        )
        .await?;
        Ok(deleted)
    }

    /// Active expenses, most recent date first.
    pub async fn list_expenses(&self, group_id: Uuid, queried_by: &str) -> Result<Vec<Expense>, FairshareError> {
        self.validate_group_membership(group_id, queried_by).await?;
        let mut expenses = self.storage.get_active_expenses(group_id).await?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        Ok(expenses)
    }

    // SETTLEMENTS

    /// Records a payment. Only the paying member may record it, and only to an
    /// active member of the same group.
    pub async fn record_settlement(
        &self,
        group_id: Uuid,
        from_member_id: Uuid,
        to_member_id: Uuid,
        amount: Money,
        recorded_by: &str,
    ) -> Result<Settlement, FairshareError> {
        info!(
            "Recording settlement in group {} from {} to {} for {}",
            group_id, from_member_id, to_member_id, amount
        );
        let actor = self.validate_group_membership(group_id, recorded_by).await?;
        if actor.id != from_member_id {
            warn!("User {} tried to record a settlement paid by {}", recorded_by, from_member_id);
            return Err(FairshareError::NotSettlementPayer(recorded_by.to_string()));
        }
        if from_member_id == to_member_id {
            return Err(FairshareError::SelfSettlement);
        }
        let payee = self
            .storage
            .get_member(to_member_id)
            .await?
            .filter(|m| m.group_id == group_id)
            .ok_or_else(|| FairshareError::UnknownMember(to_member_id.to_string()))?;
        if !payee.is_active() {
            warn!("Settlement to pending member {} in group {} rejected", to_member_id, group_id);
            return Err(FairshareError::UnknownMember(to_member_id.to_string()));
        }
        self.validate_amount_input("amount", amount)?;

        let settlement = Settlement {
            id: Uuid::new_v4(),
            group_id,
            from_member_id,
            to_member_id,
            amount,
            created_at: Utc::now(),
        };
        let activity = Self::activity(
            group_id,
            ActivityAction::Settled,
            EntityType::Settlement,
            settlement.id,
            recorded_by,
            format!("{} paid ${:.2} to {}", actor.name, amount, payee.name),
        );
        self.storage.save_settlement(settlement.clone(), activity).await?;

        self.log(
            SETTLEMENT_RECORDED,
            json!({
                "settlement_id": settlement.id,
                "group_id": group_id,
                "from_member_id": from_member_id,
                "to_member_id": to_member_id,
                "amount": amount
            }),
            recorded_by,
        )
        .await?;
        Ok(settlement)
    }

    /// Settlement history, newest first.
    pub async fn list_settlements(&self, group_id: Uuid, queried_by: &str) -> Result<Vec<Settlement>, FairshareError> {
        self.validate_group_membership(group_id, queried_by).await?;
        let mut settlements = self.storage.get_settlements(group_id).await?;
        settlements.reverse();
        Ok(settlements)
    }

    // BALANCES & DEBT SIMPLIFICATION

    fn balance_views(snapshot: &GroupSnapshot) -> Result<Vec<MemberBalanceView>, FairshareError> {
        let mut balances = ledger::compute_balances(&snapshot.members, &snapshot.expenses, &snapshot.settlements)?;
        Ok(snapshot
            .members
            .iter()
            .filter_map(|m| {
                balances.remove(&m.id).map(|balance| MemberBalanceView {
                    user_id: m.user_id.clone(),
                    name: m.name.clone(),
                    balance,
                })
            })
            .collect())
    }

    pub async fn group_balances(
        &self,
        group_id: Uuid,
        queried_by: &str,
    ) -> Result<Vec<MemberBalanceView>, FairshareError> {
        debug!("Calculating balances for group {}", group_id);
        let snapshot = self.snapshot(group_id).await?;
        Self::acting_member(&snapshot, queried_by)?;
        let views = Self::balance_views(&snapshot)?;

        self.log(BALANCES_QUERIED, json!({ "group_id": group_id }), queried_by).await?;
        Ok(views)
    }

    pub async fn debt_tree(&self, group_id: Uuid, queried_by: &str) -> Result<Vec<DebtTreeEntry>, FairshareError> {
        debug!("Building debt tree for group {}", group_id);
        let snapshot = self.snapshot(group_id).await?;
        Self::acting_member(&snapshot, queried_by)?;

        let transfers = ledger::debt_tree(&snapshot.members, &snapshot.expenses, &snapshot.settlements)?;
        let entries = transfers
            .into_iter()
            .map(|t| DebtTreeEntry {
                from_member_id: t.from,
                from_member_name: Self::name_of(&snapshot.members, t.from),
                to_member_id: t.to,
                to_member_name: Self::name_of(&snapshot.members, t.to),
                amount: t.amount,
            })
            .collect::<Vec<_>>();

        self.log(
            DEBT_TREE_QUERIED,
            json!({ "group_id": group_id, "transfers": entries.len() }),
            queried_by,
        )
        .await?;
        Ok(entries)
    }

    pub async fn group_summary(&self, group_id: Uuid, queried_by: &str) -> Result<GroupSummary, FairshareError> {
        let snapshot = self.snapshot(group_id).await?;
        let me = Self::acting_member(&snapshot, queried_by)?.id;
        let members = Self::balance_views(&snapshot)?;

        let total_spend: Money = snapshot.expenses.iter().map(|e| e.amount).sum();
        let user_balance = members
            .iter()
            .find(|v| v.balance.member_id == me)
            .map(|v| v.balance.balance)
            .unwrap_or(Decimal::ZERO);

        Ok(GroupSummary {
            group: snapshot.group.clone(),
            total_spend,
            expense_count: snapshot.expenses.len(),
            members,
            user_balance,
        })
    }

    pub async fn list_activities(&self, group_id: Uuid, queried_by: &str) -> Result<Vec<ActivityLog>, FairshareError> {
        self.validate_group_membership(group_id, queried_by).await?;
        self.storage.get_activities(group_id, ACTIVITY_PAGE_SIZE).await
    }

    // PERSONAL SPENDING

    fn validate_ids(&self, ids: &[Uuid]) -> Result<(), FairshareError> {
        if ids.is_empty() {
            return Err(FairshareError::InvalidInput(
                "ids".to_string(),
                FieldError {
                    field: "ids".to_string(),
                    title: "Invalid ids".to_string(),
                    description: "At least one id is required".to_string(),
                },
            ));
        }
        Ok(())
    }

    fn validate_description(&self, description: Option<&str>) -> Result<(), FairshareError> {
        match description {
            Some(text) => self.validate_string_input("description", text, 200),
            None => Ok(()),
        }
    }

    fn check_owner(user_id: &str, owner: &str) -> Result<(), FairshareError> {
        if owner != user_id {
            warn!("User {} tried to touch a record owned by {}", user_id, owner);
            return Err(FairshareError::NotRecordOwner(user_id.to_string()));
        }
        Ok(())
    }

    pub async fn add_personal_expense(
        &self,
        user_id: &str,
        input: NewPersonalExpense,
    ) -> Result<PersonalExpense, FairshareError> {
        info!("Adding personal expense for user {}: {}", user_id, input.amount);
        self.validate_amount_input("amount", input.amount)?;
        let category = input.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        self.validate_string_input("category", &category, 50)?;
        self.validate_description(input.description.as_deref())?;

        let now = Utc::now();
        let expense = PersonalExpense {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            amount: input.amount,
            category,
            description: input.description,
            date: input.date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
        };
        self.storage.save_personal_expense(expense.clone()).await?;

        self.log(
            PERSONAL_EXPENSE_ADDED,
            json!({ "expense_id": expense.id, "category": expense.category, "amount": expense.amount }),
            user_id,
        )
        .await?;
        Ok(expense)
    }

    /// The user's personal expenses, most recent date first.
    pub async fn list_personal_expenses(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<PersonalExpense>, FairshareError> {
        let mut expenses = self.storage.get_personal_expenses(user_id).await?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        if let Some(limit) = limit {
            expenses.truncate(limit);
        }
        Ok(expenses)
    }

    pub async fn edit_personal_expense(
        &self,
        user_id: &str,
        expense_id: Uuid,
        update: PersonalExpenseUpdate,
    ) -> Result<PersonalExpense, FairshareError> {
        info!("Editing personal expense {} for user {}", expense_id, user_id);
        let existing = self
            .storage
            .get_personal_expense(expense_id)
            .await?
            .ok_or_else(|| FairshareError::RecordNotFound(expense_id.to_string()))?;
        Self::check_owner(user_id, &existing.user_id)?;

        if let Some(amount) = update.amount {
            self.validate_amount_input("amount", amount)?;
        }
        if let Some(category) = &update.category {
            self.validate_string_input("category", category, 50)?;
        }
        self.validate_description(update.description.as_deref())?;

        let updated = PersonalExpense {
            amount: update.amount.unwrap_or(existing.amount),
            category: update.category.unwrap_or_else(|| existing.category.clone()),
            description: update.description.or_else(|| existing.description.clone()),
            date: update.date.unwrap_or(existing.date),
            ..existing
        };
        self.storage.update_personal_expense(updated.clone()).await?;

        self.log(
            PERSONAL_EXPENSE_EDITED,
            json!({ "expense_id": updated.id, "amount": updated.amount }),
            user_id,
        )
        .await?;
        Ok(updated)
    }

    /// Deletes the listed rows owned by the user; other ids are ignored.
    pub async fn delete_personal_expenses(&self, user_id: &str, ids: &[Uuid]) -> Result<usize, FairshareError> {
        self.validate_ids(ids)?;
        let deleted = self.storage.delete_personal_expenses(user_id, ids).await?;
        debug!("Deleted {} of {} personal expenses for {}", deleted, ids.len(), user_id);

        self.log(
            PERSONAL_EXPENSES_DELETED,
            json!({ "requested": ids.len(), "deleted": deleted }),
            user_id,
        )
        .await?;
        Ok(deleted)
    }

    // INCOME

    pub async fn add_income(&self, user_id: &str, input: NewIncome) -> Result<Income, FairshareError> {
        info!("Adding income for user {}: {}", user_id, input.amount);
        self.validate_amount_input("amount", input.amount)?;
        self.validate_string_input("source", &input.source, 50)?;
        self.validate_description(input.description.as_deref())?;

        let now = Utc::now();
        let income = Income {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            amount: input.amount,
            source: input.source,
            description: input.description,
            date: input.date.unwrap_or_else(|| now.date_naive()),
            created_at: now,
        };
        self.storage.save_income(income.clone()).await?;

        self.log(
            INCOME_ADDED,
            json!({ "income_id": income.id, "source": income.source, "amount": income.amount }),
            user_id,
        )
        .await?;
        Ok(income)
    }

    /// The user's income, most recent date first.
    pub async fn list_incomes(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Income>, FairshareError> {
        let mut incomes = self.storage.get_incomes(user_id).await?;
        incomes.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
        if let Some(limit) = limit {
            incomes.truncate(limit);
        }
        Ok(incomes)
    }

    pub async fn edit_income(
        &self,
        user_id: &str,
        income_id: Uuid,
        update: IncomeUpdate,
    ) -> Result<Income, FairshareError> {
        info!("Editing income {} for user {}", income_id, user_id);
        let existing = self
            .storage
            .get_income(income_id)
            .await?
            .ok_or_else(|| FairshareError::RecordNotFound(income_id.to_string()))?;
        Self::check_owner(user_id, &existing.user_id)?;

        if let Some(amount) = update.amount {
            self.validate_amount_input("amount", amount)?;
        }
        if let Some(source) = &update.source {
            self.validate_string_input("source", source, 50)?;
        }
        self.validate_description(update.description.as_deref())?;

        let updated = Income {
            amount: update.amount.unwrap_or(existing.amount),
            source: update.source.unwrap_or_else(|| existing.source.clone()),
            description: update.description.or_else(|| existing.description.clone()),
            date: update.date.unwrap_or(existing.date),
            ..existing
        };
        self.storage.update_income(updated.clone()).await?;

        self.log(
            INCOME_EDITED,
            json!({ "income_id": updated.id, "amount": updated.amount }),
            user_id,
        )
        .await?;
        Ok(updated)
    }

    pub async fn delete_incomes(&self, user_id: &str, ids: &[Uuid]) -> Result<usize, FairshareError> {
        self.validate_ids(ids)?;
        let deleted = self.storage.delete_incomes(user_id, ids).await?;

        self.log(INCOMES_DELETED, json!({ "requested": ids.len(), "deleted": deleted }), user_id)
            .await?;
        Ok(deleted)
    }

    // INSIGHTS & REPORTS

    /// Ranked signals for the calendar month containing `as_of`, with a
    /// summary and the per-category EWMA series.
    pub async fn insights(&self, user_id: &str, as_of: NaiveDate) -> Result<InsightReport, FairshareError> {
        let expenses = self.storage.get_personal_expenses(user_id).await?;
        let by_category = signals::aggregate_by_category(&expenses, as_of);

        let ctx = InsightContext::new(user_id, as_of, self.policy);
        let generated = signals::generate_all_signals(&ctx, &by_category, &self.budgets);
        let report = signals::build_report(&ctx, &by_category, generated);

        self.log(
            INSIGHTS_GENERATED,
            json!({
                "categories": by_category.len(),
                "signals": report.summary.total,
                "high_priority": report.summary.high_priority,
                "as_of": as_of
            }),
            user_id,
        )
        .await?;
        Ok(report)
    }

    /// Category totals for every month with spending. Budgeted categories
    /// always appear, at zero when unused.
    pub async fn monthly_breakdown(&self, user_id: &str) -> Result<Vec<MonthlyBreakdown>, FairshareError> {
        let expenses = self.storage.get_personal_expenses(user_id).await?;
        let mut seed: Vec<String> = self.budgets.keys().cloned().collect();
        seed.sort();
        Ok(reports::monthly_breakdown(&expenses, &seed))
    }

    pub async fn personal_stats(&self, user_id: &str, year: i32, month: u32) -> Result<PersonalStats, FairshareError> {
        if !(1..=12).contains(&month) {
            return Err(FairshareError::InvalidInput(
                "month".to_string(),
                FieldError {
                    field: "month".to_string(),
                    title: "Invalid month".to_string(),
                    description: "Month must be between 1 and 12".to_string(),
                },
            ));
        }
        let expenses = self.storage.get_personal_expenses(user_id).await?;
        let incomes = self.storage.get_incomes(user_id).await?;
        Ok(reports::personal_stats(
            &expenses,
            &incomes,
            year,
            month,
            self.monthly_budget_limit,
        ))
    }

    /// Application log, optionally only the entries attributed to one user.
    pub async fn get_app_logs(&self, user_id: Option<&str>) -> Result<Vec<AppLog>, FairshareError> {
        match user_id {
            Some(user_id) => self.logging.get_user_logs(user_id).await,
            None => self.logging.get_logs().await,
        }
    }
}
