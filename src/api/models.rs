use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::{
    errors::{FairshareError, FieldError},
    models::{Group, Member, Money},
};

/// Header carrying the caller's user id. Authentication happens upstream.
pub const USER_ID_HEADER: &str = "x-user-id";

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    /// Display name of the creating user inside the group.
    pub member_name: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateGroupResponse {
    pub group: Group,
    pub admin: Member,
}

#[derive(Deserialize, ToSchema)]
pub struct InviteMemberRequest {
    pub user_id: String,
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateSettlementRequest {
    pub from_member_id: Uuid,
    pub to_member_id: Uuid,
    #[schema(value_type = String, example = "30.00")]
    pub amount: Money,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InsightsQuery {
    /// Day to evaluate; defaults to today (UTC).
    pub as_of: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum rows to return, newest first.
    pub limit: Option<usize>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// Defaults to the current year (UTC).
    pub year: Option<i32>,
    /// 1-12; defaults to the current month (UTC).
    pub month: Option<u32>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Only entries attributed to this user.
    pub user_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteRecordsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteRecordsResponse {
    pub deleted_count: usize,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Acting user taken from the `x-user-id` header.
pub struct ActingUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ActingUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| ActingUser(id.to_string()))
            .ok_or_else(|| {
                ApiError(FairshareError::InvalidInput(
                    USER_ID_HEADER.to_string(),
                    FieldError {
                        field: USER_ID_HEADER.to_string(),
                        title: "Missing User".to_string(),
                        description: format!("{} header is required", USER_ID_HEADER),
                    },
                ))
            })
    }
}

// Newtype wrapper for FairshareError to implement IntoResponse
pub struct ApiError(pub FairshareError);

impl From<FairshareError> for ApiError {
    fn from(err: FairshareError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            FairshareError::GroupNotFound(_)
            | FairshareError::MemberNotFound(_)
            | FairshareError::ExpenseNotFound(_)
            | FairshareError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            FairshareError::NotGroupMember(_)
            | FairshareError::NotGroupAdmin(_)
            | FairshareError::NotSettlementPayer(_)
            | FairshareError::NotRecordOwner(_) => StatusCode::FORBIDDEN,
            FairshareError::AlreadyGroupMember(_) | FairshareError::InvitationAlreadyAccepted(_) => {
                StatusCode::CONFLICT
            }
            FairshareError::UnknownMember(_)
            | FairshareError::InvalidSplitUser(_)
            | FairshareError::InvalidSplit
            | FairshareError::SplitSumMismatch { .. }
            | FairshareError::InvalidAmount(..)
            | FairshareError::SelfSettlement => StatusCode::BAD_REQUEST,
            FairshareError::InvalidInput(_, _) => StatusCode::BAD_REQUEST,
            FairshareError::InternalServerError(_)
            | FairshareError::StorageError(_)
            | FairshareError::LoggingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = match &self.0 {
            FairshareError::InvalidInput(_, field) => format!("{}: {}", field.title, field.description),
            other => other.to_string(),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{}", error);
        }

        (status, Json(ErrorResponse { error })).into_response()
    }
}
