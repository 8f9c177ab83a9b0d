//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The priority marker does not name one of the three levels.
    #[error("invalid priority token '{0}', expected 低, 中, or 高")]
    InvalidPriorityToken(String),

    /// The due date token is not a real calendar date in `YYYY/MM/DD` form.
    #[error("invalid due date '{0}', expected a real date in YYYY/MM/DD format")]
    InvalidDueDate(String),

    /// The recurrence expression is not one of the supported forms.
    #[error("invalid recurrence expression '{0}'")]
    InvalidRecurrenceExpression(String),

    /// The task content is empty after trimming.
    #[error("task content must not be empty")]
    EmptyContent,

    /// The task identifier token does not follow `T-<n>` format.
    #[error("invalid task identifier '{0}', expected T-<number>")]
    InvalidTaskId(String),

    /// The member name is empty or contains whitespace.
    #[error("invalid member name '{0}'")]
    InvalidMemberName(String),
}

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseStatusError(pub String);
