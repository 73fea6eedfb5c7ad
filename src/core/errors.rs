use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum FairshareError {
    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(String),

    /// Membership record with given ID not found
    #[error("Member {0} not found")]
    MemberNotFound(String),

    /// Expense with given ID not found (or already deleted)
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),

    /// Acting user has no active membership in the group
    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    /// Acting user is a member but not an admin
    #[error("User {0} is not a group admin")]
    NotGroupAdmin(String),

    /// User already holds a membership (active or pending) in the group
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    /// Personal expense or income row missing
    #[error("Record {0} not found")]
    RecordNotFound(String),

    /// Personal record belongs to another user
    #[error("User {0} does not own this record")]
    NotRecordOwner(String),

    #[error("Invitation {0} already accepted")]
    InvitationAlreadyAccepted(String),

    /// A payer or settlement party that is not part of the group
    #[error("Member {0} does not belong to the group")]
    UnknownMember(String),

    /// Member specified in a split is not part of the group
    #[error("Invalid split member: {0}")]
    InvalidSplitUser(String),

    /// Split list is empty or otherwise unusable
    #[error("Invalid split")]
    InvalidSplit,

    /// Split amounts don't add up to the expense amount
    #[error("Split total {actual} must equal expense amount {expected}")]
    SplitSumMismatch { expected: Decimal, actual: Decimal },

    #[error("Invalid amount for `{0}`: {1}")]
    InvalidAmount(String, Decimal),

    /// Cannot create a settlement from a member to themselves
    #[error("Cannot create settlement to self")]
    SelfSettlement,

    /// Only the paying member may record a settlement
    #[error("User {0} can only record settlements they are paying")]
    NotSettlementPayer(String),

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),
}
