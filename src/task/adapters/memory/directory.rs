//! Thread-safe in-memory member directory.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{GroupId, Member, MemberId, MemberName},
    ports::{MemberDirectory, MemberDirectoryError, MemberDirectoryResult},
};

/// In-memory [`MemberDirectory`] keyed by (group, name).
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberDirectory {
    state: Arc<RwLock<HashMap<(GroupId, MemberName), Member>>>,
}

impl InMemoryMemberDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn find_by_name(
        &self,
        group: &GroupId,
        name: &MemberName,
    ) -> MemberDirectoryResult<Option<Member>> {
        let state = self.state.read().map_err(|err| {
            MemberDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&(group.clone(), name.clone())).cloned())
    }

    async fn register(
        &self,
        group: &GroupId,
        name: &MemberName,
    ) -> MemberDirectoryResult<Member> {
        let mut state = self.state.write().map_err(|err| {
            MemberDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let member = state
            .entry((group.clone(), name.clone()))
            .or_insert_with(|| {
                Member::new(
                    MemberId::new(),
                    name.clone(),
                    group.clone(),
                    DefaultClock.utc(),
                )
            });
        Ok(member.clone())
    }
}
