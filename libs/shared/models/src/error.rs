// libs/shared/models/src/error.rs
use thiserror::Error;

/// Engine-wide error taxonomy.
///
/// Conflicts and exhausted rescheduling searches are normal result values,
/// not errors; they never appear here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Raised by the persistence boundary when a commit-time recheck finds a
    /// race. Callers retry the whole check-then-commit cycle once.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),
}
