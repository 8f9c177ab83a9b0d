//! Directory port resolving mention tokens to member identities.

use crate::task::domain::{GroupId, Member, MemberName};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for member directory operations.
pub type MemberDirectoryResult<T> = Result<T, MemberDirectoryError>;

/// Member resolution contract, scoped per group.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Finds a member by display name within a group.
    ///
    /// Returns `None` when no member of that name is registered in the
    /// group; callers surface this as a typed resolution failure rather
    /// than guessing.
    async fn find_by_name(
        &self,
        group: &GroupId,
        name: &MemberName,
    ) -> MemberDirectoryResult<Option<Member>>;

    /// Registers a member, or returns the existing record.
    ///
    /// Idempotent upsert keyed by (group, name).
    async fn register(&self, group: &GroupId, name: &MemberName) -> MemberDirectoryResult<Member>;
}

/// Errors returned by member directory implementations.
#[derive(Debug, Clone, Error)]
pub enum MemberDirectoryError {
    /// Persistence-layer failure; transient and retryable by the caller.
    #[error("directory persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MemberDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
