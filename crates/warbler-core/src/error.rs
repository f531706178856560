//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    /// Unique, foreign key, NOT NULL or check constraint rejected a write.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Session has a failed commit and must be rolled back first")]
    NeedsRollback,
}

impl RepoError {
    pub fn is_integrity(&self) -> bool {
        matches!(self, RepoError::Integrity(_))
    }
}

/// Turns an absent lookup result into [`DomainError::NotFound`] for callers
/// that require the entity to exist.
pub trait RequireExt<T> {
    fn require(self, entity_type: &'static str, id: i32) -> Result<T, DomainError>;
}

impl<T> RequireExt<T> for Option<T> {
    fn require(self, entity_type: &'static str, id: i32) -> Result<T, DomainError> {
        self.ok_or(DomainError::NotFound { entity_type, id })
    }
}
