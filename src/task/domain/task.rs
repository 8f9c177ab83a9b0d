//! Task aggregate root and related lifecycle types.

use super::{
    GroupId, Member, MemberId, MemberName, ParseStatusError, Priority, RecurrenceRule,
    RecurrenceSchedule, TaskDomainError, TaskId, parse_due_date,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Task lifecycle status.
///
/// `Done` is terminal: a completed task can only be deleted, never
/// reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is awaiting completion.
    Open,
    /// Task has been completed.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    group: GroupId,
    assignee: MemberId,
    assignee_name: MemberName,
    content: String,
    priority: Priority,
    due_date: Option<NaiveDate>,
    status: TaskStatus,
    recurrence: Option<RecurrenceSchedule>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Validated input for a task not yet persisted.
///
/// The store allocates the identifier on insert; everything else is fixed
/// at draft construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    group: GroupId,
    assignee: MemberId,
    assignee_name: MemberName,
    content: String,
    priority: Priority,
    due_date: Option<NaiveDate>,
    recurrence: Option<RecurrenceSchedule>,
    created_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Creates a draft assigned to a resolved member.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyContent`] when the content is empty
    /// after trimming.
    pub fn new(
        group: GroupId,
        assignee: &Member,
        content: impl Into<String>,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let content = validated_content(content)?;
        Ok(Self {
            group,
            assignee: assignee.id(),
            assignee_name: assignee.name().clone(),
            content,
            priority,
            due_date: None,
            recurrence: None,
            created_at,
        })
    }

    /// Creates the draft for one generated occurrence of a template task.
    ///
    /// Copies the template's group, assignee, content, and priority; the
    /// occurrence is due on its generation date and carries no rule of its
    /// own.
    #[must_use]
    pub fn occurrence_of(template: &Task, date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            group: template.group().clone(),
            assignee: template.assignee(),
            assignee_name: template.assignee_name().clone(),
            content: template.content().to_owned(),
            priority: template.priority(),
            due_date: Some(date),
            recurrence: None,
            created_at,
        }
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Attaches an active recurring schedule, making this a template draft.
    #[must_use]
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(RecurrenceSchedule::new(rule));
        self
    }

    /// Returns the group scope.
    #[must_use]
    pub const fn group(&self) -> &GroupId {
        &self.group
    }

    /// Returns the assignee identifier.
    #[must_use]
    pub const fn assignee(&self) -> MemberId {
        self.assignee
    }

    /// Returns the assignee display name.
    #[must_use]
    pub const fn assignee_name(&self) -> &MemberName {
        &self.assignee_name
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the recurring schedule, if any.
    #[must_use]
    pub const fn recurrence(&self) -> Option<RecurrenceSchedule> {
        self.recurrence
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// One parsed line of a batch-create command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    content: String,
    priority: Priority,
    due_date: Option<NaiveDate>,
}

impl TaskLine {
    /// Creates a validated batch line.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyContent`] when the content is empty
    /// after trimming.
    pub fn new(
        content: impl Into<String>,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            content: validated_content(content)?,
            priority,
            due_date,
        })
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

/// Partial update over a task's mutable fields.
///
/// Only provided fields change. The token constructors re-run the same
/// validations the command parser applies, so the lifecycle engine rejects
/// invalid priority and date inputs even when driven without a parser in
/// front of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    content: Option<String>,
    priority: Option<Priority>,
    due_date: Option<NaiveDate>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: None,
            priority: None,
            due_date: None,
        }
    }

    /// Sets replacement content.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyContent`] when the content is empty
    /// after trimming.
    pub fn with_content(mut self, content: impl Into<String>) -> Result<Self, TaskDomainError> {
        self.content = Some(validated_content(content)?);
        Ok(self)
    }

    /// Sets a replacement priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a replacement priority from a raw chat marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriorityToken`] when the marker is
    /// not one of the three levels.
    pub fn with_priority_marker(self, marker: &str) -> Result<Self, TaskDomainError> {
        Ok(self.with_priority(Priority::from_marker(marker)?))
    }

    /// Sets a replacement due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets a replacement due date from a raw `YYYY/MM/DD` token.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDueDate`] when the token is not a
    /// real calendar date.
    pub fn with_due_date_token(self, token: &str) -> Result<Self, TaskDomainError> {
        Ok(self.with_due_date(parse_due_date(token)?))
    }

    /// Returns whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.priority.is_none() && self.due_date.is_none()
    }

    /// Returns the replacement content, if provided.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the replacement priority, if provided.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the replacement due date, if provided.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted group scope.
    pub group: GroupId,
    /// Persisted assignee identifier.
    pub assignee: MemberId,
    /// Persisted assignee display name.
    pub assignee_name: MemberName,
    /// Persisted content.
    pub content: String,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted recurring schedule, if any.
    pub recurrence: Option<RecurrenceSchedule>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Materialises a stored task from a draft and its allocated identifier.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        let TaskDraft {
            group,
            assignee,
            assignee_name,
            content,
            priority,
            due_date,
            recurrence,
            created_at,
        } = draft;
        Self {
            id,
            group,
            assignee,
            assignee_name,
            content,
            priority,
            due_date,
            status: TaskStatus::Open,
            recurrence,
            created_at,
            completed_at: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let PersistedTaskData {
            id,
            group,
            assignee,
            assignee_name,
            content,
            priority,
            due_date,
            status,
            recurrence,
            created_at,
            completed_at,
        } = data;
        Self {
            id,
            group,
            assignee,
            assignee_name,
            content,
            priority,
            due_date,
            status,
            recurrence,
            created_at,
            completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the group scope.
    #[must_use]
    pub const fn group(&self) -> &GroupId {
        &self.group
    }

    /// Returns the assignee identifier.
    #[must_use]
    pub const fn assignee(&self) -> MemberId {
        self.assignee
    }

    /// Returns the assignee display name captured at resolution time.
    #[must_use]
    pub const fn assignee_name(&self) -> &MemberName {
        &self.assignee_name
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns whether the task is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }

    /// Returns the recurring schedule, if any.
    #[must_use]
    pub const fn recurrence(&self) -> Option<RecurrenceSchedule> {
        self.recurrence
    }

    /// Returns whether the task defines a schedule that is still active.
    #[must_use]
    pub fn has_active_recurrence(&self) -> bool {
        self.recurrence.is_some_and(|schedule| !schedule.is_cancelled())
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Transitions the task to `Done`.
    ///
    /// Returns `false` without changing anything when the task is already
    /// complete; completion is idempotent.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) -> bool {
        if self.status == TaskStatus::Done {
            return false;
        }
        self.status = TaskStatus::Done;
        self.completed_at = Some(completed_at);
        true
    }

    /// Applies a field patch. Fields absent from the patch are untouched.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(content) = patch.content() {
            self.content = content.to_owned();
        }
        if let Some(priority) = patch.priority() {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date() {
            self.due_date = Some(due_date);
        }
    }

    /// Cancels the recurring schedule, if one exists.
    ///
    /// Returns `false` when the task carries no schedule. Cancelling an
    /// already-cancelled schedule is a successful no-op.
    pub const fn cancel_recurrence(&mut self) -> bool {
        match &mut self.recurrence {
            Some(schedule) => {
                schedule.cancel();
                true
            }
            None => false,
        }
    }

    /// Returns the deterministic listing sort key.
    ///
    /// Order: open before done, then due date ascending with dateless tasks
    /// last, then priority descending, then creation order (identifier
    /// ascending).
    #[must_use]
    pub fn listing_key(&self) -> (u8, bool, NaiveDate, Reverse<Priority>, TaskId) {
        let status_rank = match self.status {
            TaskStatus::Open => 0,
            TaskStatus::Done => 1,
        };
        (
            status_rank,
            self.due_date.is_none(),
            self.due_date.unwrap_or(NaiveDate::MIN),
            Reverse(self.priority),
            self.id,
        )
    }
}

fn validated_content(content: impl Into<String>) -> Result<String, TaskDomainError> {
    let raw = content.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyContent);
    }
    Ok(trimmed.to_owned())
}
