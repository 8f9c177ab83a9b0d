//! Identifier and validated scalar types for the task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable, human-typeable task identifier, rendered as `T-<n>`.
///
/// Values are allocated sequentially by the task store and are immutable
/// once assigned. Members reference them literally in follow-up commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a task identifier from a store-allocated sequence value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when the value is not
    /// positive.
    pub fn from_sequence(value: i64) -> Result<Self, TaskDomainError> {
        if value < 1 {
            return Err(TaskDomainError::InvalidTaskId(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses a user-typed `T-<n>` token.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when the token does not
    /// follow the `T-<n>` format or the number is not positive.
    pub fn parse(token: &str) -> Result<Self, TaskDomainError> {
        let digits = token
            .strip_prefix("T-")
            .ok_or_else(|| TaskDomainError::InvalidTaskId(token.to_owned()))?;
        let value = digits
            .parse::<i64>()
            .map_err(|_| TaskDomainError::InvalidTaskId(token.to_owned()))?;
        Self::from_sequence(value).map_err(|_| TaskDomainError::InvalidTaskId(token.to_owned()))
    }

    /// Returns the wrapped sequence value.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

/// Opaque identifier of the chat context a task belongs to.
///
/// Carried verbatim from the messaging platform; tasks, members, and
/// listings never cross group boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates a group identifier from a platform-provided value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a registered member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    /// Creates a new random member identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a member identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name used in mention tokens, unique per group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberName(String);

impl MemberName {
    /// Creates a validated member name.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidMemberName`] when the value is
    /// empty after trimming or contains interior whitespace (mention tokens
    /// are single words).
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(TaskDomainError::InvalidMemberName(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
