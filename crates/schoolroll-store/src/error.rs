use thiserror::Error;

/// Errors raised by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver failure, including constraint violations (missing field,
    /// duplicate key, dangling foreign key).
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    /// An update targeted a row that does not exist.
    #[error("{table} row {id} not found")]
    NotFound { table: &'static str, id: String },
    /// A stored value could not be mapped back to its domain type.
    #[error("invalid stored value: {0}")]
    Decode(#[from] schoolroll_core::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
