use alloy_primitives::B256;

/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// A log is missing the fields which locate it in the chain.
    #[error("log emitted in transaction {0:?} is missing its block position")]
    IncompleteLog(Option<B256>),
    /// A numeric value does not fit in the database column.
    #[error("value {0} overflows the database column")]
    ValueOverflow(u64),
}
