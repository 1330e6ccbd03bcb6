use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),
}

/// Errors surfaced by the persistence layer.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Not found")]
    NotFound,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Stored item is malformed: {0}")]
    Corrupt(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
