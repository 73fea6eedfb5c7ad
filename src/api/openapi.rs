use utoipa::OpenApi;

use crate::{
    api::models::{
        CreateGroupRequest, CreateGroupResponse, CreateSettlementRequest, DeleteRecordsRequest, DeleteRecordsResponse,
        ErrorResponse, InviteMemberRequest,
    },
    core::{
        ledger::MemberBalance,
        models::{
            ActivityAction, ActivityLog, AppLog, EntityType, Expense, ExpenseStatus, Group, Income, IncomeUpdate,
            Member, MembershipStatus, NewExpense, NewIncome, NewPersonalExpense, PersonalExpense,
            PersonalExpenseUpdate, Role, Settlement, Split, SplitMode,
        },
        reports::{BudgetProgress, CategoryTotal, MonthlyBreakdown, PersonalStats, Transaction, TransactionKind},
        services::{DebtTreeEntry, GroupSummary, MemberBalanceView},
        signals::{EwmaPoint, InsightReport, Severity, Signal, SignalSummary, SignalType, SignalValue},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_group,
        super::handlers::delete_group,
        super::handlers::invite_member,
        super::handlers::accept_invitation,
        super::handlers::add_expense,
        super::handlers::list_expenses,
        super::handlers::edit_expense,
        super::handlers::delete_expense,
        super::handlers::record_settlement,
        super::handlers::list_settlements,
        super::handlers::get_balances,
        super::handlers::get_debt_tree,
        super::handlers::get_summary,
        super::handlers::get_activities,
        super::handlers::add_personal_expense,
        super::handlers::list_personal_expenses,
        super::handlers::edit_personal_expense,
        super::handlers::delete_personal_expenses,
        super::handlers::get_personal_stats,
        super::handlers::add_income,
        super::handlers::list_incomes,
        super::handlers::edit_income,
        super::handlers::delete_incomes,
        super::handlers::get_insights,
        super::handlers::get_monthly_breakdown,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateGroupRequest,
        CreateGroupResponse,
        InviteMemberRequest,
        CreateSettlementRequest,
        DeleteRecordsRequest,
        DeleteRecordsResponse,
        ErrorResponse,
        Group,
        Member,
        Role,
        MembershipStatus,
        Expense,
        ExpenseStatus,
        Split,
        SplitMode,
        NewExpense,
        Settlement,
        PersonalExpense,
        NewPersonalExpense,
        PersonalExpenseUpdate,
        Income,
        NewIncome,
        IncomeUpdate,
        MonthlyBreakdown,
        PersonalStats,
        CategoryTotal,
        Transaction,
        TransactionKind,
        BudgetProgress,
        MemberBalance,
        MemberBalanceView,
        DebtTreeEntry,
        GroupSummary,
        ActivityLog,
        ActivityAction,
        EntityType,
        AppLog,
        Signal,
        InsightReport,
        SignalSummary,
        EwmaPoint,
        SignalType,
        SignalValue,
        Severity
    )),
    info(
        title = "Fairshare API",
        description = "API for shared group expenses, settlements and personal spending insights",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
