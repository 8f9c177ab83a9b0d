//! Diesel row models for task and member persistence.

use super::schema::{members, recurrence_occurrences, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Sequence-allocated task identifier.
    pub id: i64,
    /// Chat context the task belongs to.
    pub group_id: String,
    /// Resolved assignee identifier.
    pub assignee_id: uuid::Uuid,
    /// Assignee display name.
    pub assignee_name: String,
    /// Free-text task content.
    pub content: String,
    /// Priority level.
    pub priority: String,
    /// Optional calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: String,
    /// Recurring schedule JSON payload.
    pub recurrence: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for task records; the id comes from the table sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Chat context the task belongs to.
    pub group_id: String,
    /// Resolved assignee identifier.
    pub assignee_id: uuid::Uuid,
    /// Assignee display name.
    pub assignee_name: String,
    /// Free-text task content.
    pub content: String,
    /// Priority level.
    pub priority: String,
    /// Optional calendar due date.
    pub due_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: String,
    /// Recurring schedule JSON payload.
    pub recurrence: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, if completed.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Query result row for member records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MemberRow {
    /// Member identifier.
    pub id: uuid::Uuid,
    /// Display name used in mention tokens.
    pub name: String,
    /// Chat context the member belongs to.
    pub group_id: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for member records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = members)]
pub struct NewMemberRow {
    /// Member identifier.
    pub id: uuid::Uuid,
    /// Display name used in mention tokens.
    pub name: String,
    /// Chat context the member belongs to.
    pub group_id: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for occurrence ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recurrence_occurrences)]
pub struct NewOccurrenceRow {
    /// Template task that produced the occurrence.
    pub template_id: i64,
    /// Date the occurrence was generated for.
    pub occurrence_date: NaiveDate,
    /// Generation timestamp.
    pub created_at: DateTime<Utc>,
}
