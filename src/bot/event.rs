//! The inbound event consumed from the messaging transport.

use crate::task::domain::GroupId;

/// One inbound group message, as delivered by the transport collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    group: GroupId,
    sender: String,
    text: String,
}

impl InboundEvent {
    /// Creates an event from transport-provided fields.
    pub fn new(group: GroupId, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            group,
            sender: sender.into(),
            text: text.into(),
        }
    }

    /// Returns the group scope the message arrived in.
    #[must_use]
    pub const fn group(&self) -> &GroupId {
        &self.group
    }

    /// Returns the platform identity of the sender.
    ///
    /// Trust is delegated to the platform; the sender is carried for
    /// logging, not authenticated here.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the raw message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
