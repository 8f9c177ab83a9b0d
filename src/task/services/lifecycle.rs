//! Service layer applying task commands against the store.

use crate::task::{
    domain::{
        GroupId, Member, MemberName, Priority, RecurrenceRule, Task, TaskDomainError, TaskDraft,
        TaskId, TaskLine, TaskPatch,
    },
    ports::{
        CancelOutcome, CompletionRecord, MemberDirectory, MemberDirectoryError, TaskStore,
        TaskStoreError,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    group: GroupId,
    assignee: MemberName,
    content: String,
    priority: Priority,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields and default priority.
    pub fn new(group: GroupId, assignee: MemberName, content: impl Into<String>) -> Self {
        Self {
            group,
            assignee,
            content: content.into(),
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Request payload for creating several tasks at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCreateRequest {
    group: GroupId,
    assignee: MemberName,
    lines: Vec<TaskLine>,
}

impl BatchCreateRequest {
    /// Creates a batch request; every line is assigned to the same member.
    #[must_use]
    pub const fn new(group: GroupId, assignee: MemberName, lines: Vec<TaskLine>) -> Self {
        Self {
            group,
            assignee,
            lines,
        }
    }
}

/// Request payload for creating a recurring-schedule template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecurringRequest {
    group: GroupId,
    assignee: MemberName,
    content: String,
    priority: Priority,
    rule: RecurrenceRule,
}

impl CreateRecurringRequest {
    /// Creates a request with required fields and default priority.
    pub fn new(
        group: GroupId,
        assignee: MemberName,
        content: impl Into<String>,
        rule: RecurrenceRule,
    ) -> Self {
        Self {
            group,
            assignee,
            content: content.into(),
            priority: Priority::default(),
            rule,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Result of creating a recurring template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringCreation {
    /// The stored rule-bearing template.
    pub template: Task,
    /// The immediately generated first occurrence, when the calendar scan
    /// produced one.
    pub first_occurrence: Option<Task>,
}

/// Service-level errors for task command operations.
#[derive(Debug, Error)]
pub enum TaskCommandError {
    /// The mention token resolved to no registered member in the group.
    #[error("member not found: {0}")]
    MemberNotFound(MemberName),

    /// The task identifier resolved to no task in the group.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task carries no recurring schedule to cancel.
    #[error("task {0} has no recurring schedule")]
    NotRecurring(TaskId),

    /// Domain validation failed.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Member directory operation failed.
    #[error(transparent)]
    Directory(#[from] MemberDirectoryError),

    /// Task store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task command operations.
pub type TaskCommandResult<T> = Result<T, TaskCommandError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<S, D, C>
where
    S: TaskStore,
    D: MemberDirectory,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<S, D, C> TaskLifecycleService<S, D, C>
where
    S: TaskStore,
    D: MemberDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    /// Creates a single open task.
    ///
    /// Unknown assignees are registered on the fly, so creation always
    /// succeeds for a well-formed request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError`] when content validation fails or the
    /// store rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskCommandResult<Task> {
        let CreateTaskRequest {
            group,
            assignee,
            content,
            priority,
            due_date,
        } = request;
        let member = self.directory.register(&group, &assignee).await?;
        let mut draft = TaskDraft::new(group, &member, content, priority, self.clock.utc())?;
        if let Some(date) = due_date {
            draft = draft.with_due_date(date);
        }
        let task = self.store.insert(draft).await?;
        tracing::info!(task_id = %task.id(), group = %task.group(), "task created");
        Ok(task)
    }

    /// Creates every line of a batch as its own task, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError`] when the batch is empty, any line fails
    /// validation, or the store rejects the transaction. No task persists
    /// on failure.
    pub async fn batch_create(&self, request: BatchCreateRequest) -> TaskCommandResult<Vec<Task>> {
        let BatchCreateRequest {
            group,
            assignee,
            lines,
        } = request;
        if lines.is_empty() {
            return Err(TaskDomainError::EmptyContent.into());
        }
        let member = self.directory.register(&group, &assignee).await?;
        let created_at = self.clock.utc();
        let drafts = lines
            .iter()
            .map(|line| {
                let mut draft = TaskDraft::new(
                    group.clone(),
                    &member,
                    line.content(),
                    line.priority(),
                    created_at,
                )?;
                if let Some(date) = line.due_date() {
                    draft = draft.with_due_date(date);
                }
                Ok(draft)
            })
            .collect::<Result<Vec<_>, TaskDomainError>>()?;
        let tasks = self.store.insert_batch(drafts).await?;
        tracing::info!(count = tasks.len(), group = %group, "batch created");
        Ok(tasks)
    }

    /// Creates a recurring template and immediately generates its first
    /// occurrence.
    ///
    /// The first occurrence is due on the rule's next fire date after
    /// today and is recorded in the occurrence ledger, so the scheduled
    /// trigger cannot generate it a second time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError`] when content validation fails or the
    /// store rejects persistence.
    pub async fn create_recurring(
        &self,
        request: CreateRecurringRequest,
    ) -> TaskCommandResult<RecurringCreation> {
        let CreateRecurringRequest {
            group,
            assignee,
            content,
            priority,
            rule,
        } = request;
        let member = self.directory.register(&group, &assignee).await?;
        let now = self.clock.utc();
        let draft =
            TaskDraft::new(group, &member, content, priority, now)?.with_recurrence(rule);
        let template = self.store.insert(draft).await?;

        let first_occurrence = match rule.next_occurrence(now.date_naive()) {
            Some(date) => {
                let occurrence_draft = TaskDraft::occurrence_of(&template, date, now);
                self.store
                    .insert_occurrence(template.id(), date, occurrence_draft)
                    .await?
            }
            None => None,
        };
        tracing::info!(template_id = %template.id(), rule = %rule, "recurring template created");
        Ok(RecurringCreation {
            template,
            first_occurrence,
        })
    }

    /// Cancels a template's recurring schedule.
    ///
    /// Cancelling an already-cancelled schedule succeeds; the schedule
    /// stays cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::TaskNotFound`] when the id resolves to
    /// no task in the group and [`TaskCommandError::NotRecurring`] when the
    /// task carries no schedule.
    pub async fn cancel_recurring(&self, group: &GroupId, id: TaskId) -> TaskCommandResult<Task> {
        match self.store.cancel_recurrence(group, id).await? {
            None => Err(TaskCommandError::TaskNotFound(id)),
            Some(CancelOutcome::NotRecurring) => Err(TaskCommandError::NotRecurring(id)),
            Some(CancelOutcome::Cancelled(task)) => {
                tracing::info!(task_id = %id, "recurring schedule cancelled");
                Ok(task)
            }
        }
    }

    /// Completes a task.
    ///
    /// Idempotent by design: completing an already-completed task succeeds
    /// and reports `already_done` instead of raising a state error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::TaskNotFound`] when the id resolves to
    /// no task in the group.
    pub async fn complete(
        &self,
        group: &GroupId,
        id: TaskId,
    ) -> TaskCommandResult<CompletionRecord> {
        let completed_at = self.clock.utc();
        self.store
            .complete(group, id, completed_at)
            .await?
            .ok_or(TaskCommandError::TaskNotFound(id))
    }

    /// Updates a task's content, priority, and/or due date.
    ///
    /// Only fields present in the patch change; the patch re-validates its
    /// inputs on construction, so the engine stays safe when driven
    /// without the chat parser in front of it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::TaskNotFound`] when the id resolves to
    /// no task in the group.
    pub async fn update(
        &self,
        group: &GroupId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskCommandResult<Task> {
        self.store
            .apply_patch(group, id, patch)
            .await?
            .ok_or(TaskCommandError::TaskNotFound(id))
    }

    /// Permanently deletes a task, in any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::TaskNotFound`] when the id resolves to
    /// no task in the group; deleting a missing task is never a silent
    /// success.
    pub async fn delete(&self, group: &GroupId, id: TaskId) -> TaskCommandResult<Task> {
        let deleted = self
            .store
            .delete(group, id)
            .await?
            .ok_or(TaskCommandError::TaskNotFound(id))?;
        tracing::info!(task_id = %id, group = %group, "task deleted");
        Ok(deleted)
    }

    /// Lists the group's tasks, optionally filtered by assignee.
    ///
    /// The filter resolves strictly: an unregistered name is a
    /// [`TaskCommandError::MemberNotFound`], never an empty listing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError`] when resolution or the store lookup
    /// fails.
    pub async fn list(
        &self,
        group: &GroupId,
        assignee: Option<&MemberName>,
    ) -> TaskCommandResult<Vec<Task>> {
        let filter = match assignee {
            Some(name) => Some(self.resolve(group, name).await?.id()),
            None => None,
        };
        Ok(self.store.list(group, filter).await?)
    }

    /// Fetches the full record for one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::TaskNotFound`] when the id resolves to
    /// no task in the group.
    pub async fn detail(&self, group: &GroupId, id: TaskId) -> TaskCommandResult<Task> {
        self.store
            .find_by_id(group, id)
            .await?
            .ok_or(TaskCommandError::TaskNotFound(id))
    }

    /// Generates today's occurrence for every active recurring template.
    ///
    /// Scans all groups. A template produces at most one occurrence per
    /// date: the store's ledger makes repeated and concurrent invocations
    /// for the same `today` no-ops for already-generated pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCommandError::Store`] when the scan or an insert
    /// fails.
    pub async fn generate_recurring_occurrences(
        &self,
        today: NaiveDate,
    ) -> TaskCommandResult<Vec<Task>> {
        let templates = self.store.recurrence_templates().await?;
        let mut generated = Vec::new();
        for template in templates {
            let Some(schedule) = template.recurrence() else {
                continue;
            };
            if schedule.is_cancelled() || !schedule.rule().occurs_on(today) {
                continue;
            }
            let draft = TaskDraft::occurrence_of(&template, today, self.clock.utc());
            if let Some(task) = self
                .store
                .insert_occurrence(template.id(), today, draft)
                .await?
            {
                tracing::info!(
                    template_id = %template.id(),
                    task_id = %task.id(),
                    date = %today,
                    "recurring occurrence generated"
                );
                generated.push(task);
            }
        }
        Ok(generated)
    }

    async fn resolve(&self, group: &GroupId, name: &MemberName) -> TaskCommandResult<Member> {
        self.directory
            .find_by_name(group, name)
            .await?
            .ok_or_else(|| TaskCommandError::MemberNotFound(name.clone()))
    }
}
