//! Typed parse errors for chat commands.

use crate::task::domain::TaskDomainError;
use thiserror::Error;

/// Errors produced while parsing a marker-prefixed command.
///
/// Every variant maps to a specific user-facing reply; a command that
/// fails to parse never reaches the lifecycle engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandParseError {
    /// The keyword after the marker is not in the command table.
    #[error("unknown command keyword '{0}'")]
    UnknownCommand(String),

    /// A required argument is absent. The payload is the user-facing name
    /// of the missing piece.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// A `!`-prefixed token does not name one of the three priorities.
    #[error("invalid priority token '{0}'")]
    InvalidPriorityToken(String),

    /// A trailing date token is not a real `YYYY/MM/DD` date.
    #[error("invalid date '{0}'")]
    InvalidDateFormat(String),

    /// The recurrence expression is not one of the supported forms.
    #[error("invalid recurrence expression '{0}'")]
    InvalidRecurrenceExpression(String),

    /// The command requires a mention token and none was given.
    #[error("missing @mention token")]
    MissingMention,

    /// The command requires a task identifier and none (or a malformed
    /// one) was given.
    #[error("missing or malformed task identifier")]
    MissingTaskId,
}

impl From<TaskDomainError> for CommandParseError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::InvalidPriorityToken(token) => Self::InvalidPriorityToken(token),
            TaskDomainError::InvalidDueDate(token) => Self::InvalidDateFormat(token),
            TaskDomainError::InvalidRecurrenceExpression(expr) => {
                Self::InvalidRecurrenceExpression(expr)
            }
            TaskDomainError::EmptyContent => Self::MissingArgument("任務內容"),
            TaskDomainError::InvalidTaskId(_) => Self::MissingTaskId,
            TaskDomainError::InvalidMemberName(_) => Self::MissingMention,
        }
    }
}
