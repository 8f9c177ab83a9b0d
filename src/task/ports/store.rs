//! Storage port for task persistence, lookup, and atomic mutation.

use crate::task::domain::{GroupId, MemberId, Task, TaskDraft, TaskId, TaskPatch};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Outcome of an idempotent completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    /// The task after the operation.
    pub task: Task,
    /// Whether the task was already complete before this call.
    pub already_done: bool,
}

/// Outcome of a recurrence cancellation against an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The schedule is now cancelled (possibly already was).
    Cancelled(Task),
    /// The task carries no recurring schedule.
    NotRecurring,
}

/// Task persistence contract.
///
/// Mutating operations against a single task id (`complete`, `apply_patch`,
/// `delete`, `cancel_recurrence`) are atomic read-modify-write steps:
/// concurrent callers racing on the same task observe one serialised order
/// and no update is lost. Occurrence generation is deduplicated by a ledger
/// keyed on (template id, occurrence date) inside the store, not by
/// application-level locking.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a draft, allocating the next task identifier.
    async fn insert(&self, draft: TaskDraft) -> TaskStoreResult<Task>;

    /// Persists a batch of drafts, all-or-nothing.
    ///
    /// Either every draft is stored or, on any failure, none is.
    async fn insert_batch(&self, drafts: Vec<TaskDraft>) -> TaskStoreResult<Vec<Task>>;

    /// Finds a task by identifier within a group scope.
    ///
    /// Returns `None` when the task does not exist in that group.
    async fn find_by_id(&self, group: &GroupId, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Atomically completes a task.
    ///
    /// Returns `None` when the task does not exist in the group; otherwise
    /// reports whether it had already been completed. Idempotent.
    async fn complete(
        &self,
        group: &GroupId,
        id: TaskId,
        completed_at: DateTime<Utc>,
    ) -> TaskStoreResult<Option<CompletionRecord>>;

    /// Atomically applies a field patch to a task.
    ///
    /// Returns the updated task, or `None` when the task does not exist in
    /// the group.
    async fn apply_patch(
        &self,
        group: &GroupId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskStoreResult<Option<Task>>;

    /// Permanently removes a task.
    ///
    /// Returns the removed task, or `None` when it did not exist in the
    /// group.
    async fn delete(&self, group: &GroupId, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Atomically cancels a task's recurring schedule.
    ///
    /// Returns `None` when the task does not exist in the group.
    async fn cancel_recurrence(
        &self,
        group: &GroupId,
        id: TaskId,
    ) -> TaskStoreResult<Option<CancelOutcome>>;

    /// Lists tasks in a group, optionally filtered by assignee, in the
    /// deterministic listing order documented on
    /// [`Task::listing_key`](crate::task::domain::Task::listing_key).
    async fn list(
        &self,
        group: &GroupId,
        assignee: Option<MemberId>,
    ) -> TaskStoreResult<Vec<Task>>;

    /// Returns all tasks across all groups whose recurring schedule is
    /// still active.
    async fn recurrence_templates(&self) -> TaskStoreResult<Vec<Task>>;

    /// Persists one generated occurrence of a template, recording it in the
    /// occurrence ledger.
    ///
    /// Returns `None` without storing anything when the ledger already
    /// holds an entry for (`template_id`, `date`); this is the idempotence
    /// guarantee for repeated or concurrent generation runs.
    async fn insert_occurrence(
        &self,
        template_id: TaskId,
        date: NaiveDate,
        draft: TaskDraft,
    ) -> TaskStoreResult<Option<Task>>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// Persistence-layer failure; transient and retryable by the caller.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
