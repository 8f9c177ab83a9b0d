//! Task priority levels and their chat-facing markers.

use super::{ParsePriorityError, TaskDomainError};
use serde::{Deserialize, Serialize};

/// Task priority level.
///
/// Variants are ordered so that `High` compares greatest; listings sort by
/// descending priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Default priority when no marker is given.
    #[default]
    Normal,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// Returns the single-character marker shown in replies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "低",
            Self::Normal => "中",
            Self::High => "高",
        }
    }

    /// Parses a chat priority marker (the text after the `!` prefix).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriorityToken`] for anything other
    /// than the three closed markers.
    pub fn from_marker(marker: &str) -> Result<Self, TaskDomainError> {
        match marker {
            "低" => Ok(Self::Low),
            "中" => Ok(Self::Normal),
            "高" => Ok(Self::High),
            _ => Err(TaskDomainError::InvalidPriorityToken(marker.to_owned())),
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}
