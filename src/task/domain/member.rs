//! Member identity resolved from mention tokens.

use super::{GroupId, MemberId, MemberName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered member of a group.
///
/// Mention tokens resolve to members through the directory port; tasks
/// reference members by [`MemberId`], never by raw mention text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: MemberName,
    group: GroupId,
    registered_at: DateTime<Utc>,
}

impl Member {
    /// Creates a member record.
    #[must_use]
    pub const fn new(
        id: MemberId,
        name: MemberName,
        group: GroupId,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            group,
            registered_at,
        }
    }

    /// Returns the member identifier.
    #[must_use]
    pub const fn id(&self) -> MemberId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &MemberName {
        &self.name
    }

    /// Returns the group the member belongs to.
    #[must_use]
    pub const fn group(&self) -> &GroupId {
        &self.group
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}
