use crate::{
    api::models::*,
    core::{
        models::{
            ActivityLog, AppLog, Expense, Income, IncomeUpdate, Member, NewExpense, NewIncome, NewPersonalExpense,
            PersonalExpense, PersonalExpenseUpdate, Settlement,
        },
        reports::{MonthlyBreakdown, PersonalStats},
        services::{DebtTreeEntry, FairshareService, GroupSummary, MemberBalanceView},
        signals::InsightReport,
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::{Datelike, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub type AppService = FairshareService<InMemoryLogging, InMemoryStorage>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", delete(delete_group))
        .route("/groups/{group_id}/invites", post(invite_member))
        .route("/members/{member_id}/accept", post(accept_invitation))
        .route("/groups/{group_id}/expenses", post(add_expense).get(list_expenses))
        .route(
            "/groups/{group_id}/expenses/{expense_id}",
            put(edit_expense).delete(delete_expense),
        )
        .route(
            "/groups/{group_id}/settlements",
            post(record_settlement).get(list_settlements),
        )
        .route("/groups/{group_id}/balances", get(get_balances))
        .route("/groups/{group_id}/debt-tree", get(get_debt_tree))
        .route("/groups/{group_id}/summary", get(get_summary))
        .route("/groups/{group_id}/activities", get(get_activities))
        .route(
            "/personal/expenses",
            post(add_personal_expense)
                .get(list_personal_expenses)
                .delete(delete_personal_expenses),
        )
        .route("/personal/expenses/{expense_id}", put(edit_personal_expense))
        .route("/personal/stats", get(get_personal_stats))
        .route("/income", post(add_income).get(list_incomes).delete(delete_incomes))
        .route("/income/{income_id}", put(edit_income))
        .route("/insights", get(get_insights))
        .route("/insights/monthly-breakdown", get(get_monthly_breakdown))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    params(("x-user-id" = String, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Group created", body = CreateGroupResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn create_group(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    let (group, admin) = service.create_group(req.name, &user_id, req.member_name).await?;
    Ok((StatusCode::CREATED, Json(CreateGroupResponse { group, admin })))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 403, description = "Not a group admin", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn delete_group(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete_group(group_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/invites",
    request_body = InviteMemberRequest,
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 201, description = "Invitation created", body = Member),
        (status = 403, description = "Not a group admin", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse)
    )
)]
async fn invite_member(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<InviteMemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = service.invite_member(group_id, &req.user_id, req.name, &user_id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    post,
    path = "/api/members/{member_id}/accept",
    params(
        ("member_id" = Uuid, Path, description = "Pending membership ID"),
        ("x-user-id" = String, Header, description = "Invited user")
    ),
    responses(
        (status = 200, description = "Invitation accepted", body = Member),
        (status = 404, description = "Invitation not found", body = ErrorResponse),
        (status = 409, description = "Already accepted", body = ErrorResponse)
    )
)]
async fn accept_invitation(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Member>, ApiError> {
    let member = service.accept_invitation(member_id, &user_id).await?;
    Ok(Json(member))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    request_body = NewExpense,
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 201, description = "Expense added", body = Expense),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn add_expense(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = service.add_expense(group_id, req, &user_id).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/expenses",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Active expenses, newest first", body = [Expense]),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn list_expenses(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = service.list_expenses(group_id, &user_id).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    put,
    path = "/api/groups/{group_id}/expenses/{expense_id}",
    request_body = NewExpense,
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("expense_id" = Uuid, Path, description = "Expense ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Expense replaced", body = Expense),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
async fn edit_expense(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path((group_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<NewExpense>,
) -> Result<Json<Expense>, ApiError> {
    let expense = service.edit_expense(group_id, expense_id, req, &user_id).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}/expenses/{expense_id}",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("expense_id" = Uuid, Path, description = "Expense ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Expense marked deleted", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
async fn delete_expense(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path((group_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Expense>, ApiError> {
    let expense = service.delete_expense(group_id, expense_id, &user_id).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/settlements",
    request_body = CreateSettlementRequest,
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Paying user")
    ),
    responses(
        (status = 201, description = "Settlement recorded", body = Settlement),
        (status = 400, description = "Invalid settlement", body = ErrorResponse),
        (status = 403, description = "Only the payer may record", body = ErrorResponse)
    )
)]
async fn record_settlement(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
    Json(req): Json<CreateSettlementRequest>,
) -> Result<(StatusCode, Json<Settlement>), ApiError> {
    let settlement = service
        .record_settlement(group_id, req.from_member_id, req.to_member_id, req.amount, &user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(settlement)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/settlements",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Settlements, newest first", body = [Settlement]),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn list_settlements(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    let settlements = service.list_settlements(group_id, &user_id).await?;
    Ok(Json(settlements))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Net balance per member", body = [MemberBalanceView]),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn get_balances(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<MemberBalanceView>>, ApiError> {
    let balances = service.group_balances(group_id, &user_id).await?;
    Ok(Json(balances))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/debt-tree",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Suggested transfers", body = [DebtTreeEntry]),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn get_debt_tree(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<DebtTreeEntry>>, ApiError> {
    let tree = service.debt_tree(group_id, &user_id).await?;
    Ok(Json(tree))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/summary",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Group totals and balances", body = GroupSummary),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn get_summary(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupSummary>, ApiError> {
    let summary = service.group_summary(group_id, &user_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/activities",
    params(
        ("group_id" = Uuid, Path, description = "Group ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Recent group activity", body = [ActivityLog]),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn get_activities(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    let activities = service.list_activities(group_id, &user_id).await?;
    Ok(Json(activities))
}

#[utoipa::path(
    post,
    path = "/api/personal/expenses",
    request_body = NewPersonalExpense,
    params(("x-user-id" = String, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Personal expense recorded", body = PersonalExpense),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
async fn add_personal_expense(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<NewPersonalExpense>,
) -> Result<(StatusCode, Json<PersonalExpense>), ApiError> {
    let expense = service.add_personal_expense(&user_id, req).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/personal/expenses",
    params(
        ListQuery,
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Personal expenses, newest first", body = [PersonalExpense])
    )
)]
async fn list_personal_expenses(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PersonalExpense>>, ApiError> {
    let expenses = service.list_personal_expenses(&user_id, query.limit).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    put,
    path = "/api/personal/expenses/{expense_id}",
    request_body = PersonalExpenseUpdate,
    params(
        ("expense_id" = Uuid, Path, description = "Personal expense ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Personal expense updated", body = PersonalExpense),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "Personal expense not found", body = ErrorResponse)
    )
)]
async fn edit_personal_expense(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(expense_id): Path<Uuid>,
    Json(req): Json<PersonalExpenseUpdate>,
) -> Result<Json<PersonalExpense>, ApiError> {
    let expense = service.edit_personal_expense(&user_id, expense_id, req).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    delete,
    path = "/api/personal/expenses",
    request_body = DeleteRecordsRequest,
    params(("x-user-id" = String, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Rows deleted", body = DeleteRecordsResponse),
        (status = 400, description = "No ids given", body = ErrorResponse)
    )
)]
async fn delete_personal_expenses(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<DeleteRecordsRequest>,
) -> Result<Json<DeleteRecordsResponse>, ApiError> {
    let deleted_count = service.delete_personal_expenses(&user_id, &req.ids).await?;
    Ok(Json(DeleteRecordsResponse { deleted_count }))
}

#[utoipa::path(
    get,
    path = "/api/personal/stats",
    params(
        StatsQuery,
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Income, spending and budget for one month", body = PersonalStats),
        (status = 400, description = "Invalid month", body = ErrorResponse)
    )
)]
async fn get_personal_stats(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<PersonalStats>, ApiError> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let stats = service.personal_stats(&user_id, year, month).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    post,
    path = "/api/income",
    request_body = NewIncome,
    params(("x-user-id" = String, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Income recorded", body = Income),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
async fn add_income(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<NewIncome>,
) -> Result<(StatusCode, Json<Income>), ApiError> {
    let income = service.add_income(&user_id, req).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

#[utoipa::path(
    get,
    path = "/api/income",
    params(
        ListQuery,
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Income, newest first", body = [Income])
    )
)]
async fn list_incomes(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Income>>, ApiError> {
    let incomes = service.list_incomes(&user_id, query.limit).await?;
    Ok(Json(incomes))
}

#[utoipa::path(
    put,
    path = "/api/income/{income_id}",
    request_body = IncomeUpdate,
    params(
        ("income_id" = Uuid, Path, description = "Income ID"),
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Income updated", body = Income),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "Income not found", body = ErrorResponse)
    )
)]
async fn edit_income(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Path(income_id): Path<Uuid>,
    Json(req): Json<IncomeUpdate>,
) -> Result<Json<Income>, ApiError> {
    let income = service.edit_income(&user_id, income_id, req).await?;
    Ok(Json(income))
}

#[utoipa::path(
    delete,
    path = "/api/income",
    request_body = DeleteRecordsRequest,
    params(("x-user-id" = String, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Rows deleted", body = DeleteRecordsResponse),
        (status = 400, description = "No ids given", body = ErrorResponse)
    )
)]
async fn delete_incomes(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<DeleteRecordsRequest>,
) -> Result<Json<DeleteRecordsResponse>, ApiError> {
    let deleted_count = service.delete_incomes(&user_id, &req.ids).await?;
    Ok(Json(DeleteRecordsResponse { deleted_count }))
}

#[utoipa::path(
    get,
    path = "/api/insights",
    params(
        InsightsQuery,
        ("x-user-id" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Ranked spending signals with summary and chart data", body = InsightReport),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_insights(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<InsightReport>, ApiError> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let report = service.insights(&user_id, as_of).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/insights/monthly-breakdown",
    params(("x-user-id" = String, Header, description = "Acting user")),
    responses(
        (status = 200, description = "Category totals per month, oldest first", body = [MonthlyBreakdown])
    )
)]
async fn get_monthly_breakdown(
    State(service): State<Arc<AppService>>,
    ActingUser(user_id): ActingUser,
) -> Result<Json<Vec<MonthlyBreakdown>>, ApiError> {
    let breakdown = service.monthly_breakdown(&user_id).await?;
    Ok(Json(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "Application action log", body = [AppLog]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs(query.user_id.as_deref()).await?;
    Ok(Json(logs))
}
