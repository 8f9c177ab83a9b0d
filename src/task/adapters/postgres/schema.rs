//! Diesel schema for task tracker persistence.
//!
//! `tasks.id` is backed by a `BIGSERIAL` sequence; `members` carries a
//! unique constraint on (`name`, `group_id`); the composite primary key of
//! `recurrence_occurrences` is the uniqueness guarantee that makes
//! occurrence generation idempotent.

diesel::table! {
    /// Task records, scoped by group.
    tasks (id) {
        /// Sequence-allocated task identifier.
        id -> Int8,
        /// Chat context the task belongs to.
        group_id -> Varchar,
        /// Resolved assignee identifier.
        assignee_id -> Uuid,
        /// Assignee display name captured at resolution time.
        #[max_length = 255]
        assignee_name -> Varchar,
        /// Free-text task content.
        content -> Text,
        /// Priority level.
        #[max_length = 16]
        priority -> Varchar,
        /// Optional calendar due date.
        due_date -> Nullable<Date>,
        /// Lifecycle status.
        #[max_length = 16]
        status -> Varchar,
        /// Recurring schedule payload for template tasks.
        recurrence -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Completion timestamp, set when status becomes done.
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Registered members, unique per (name, group).
    members (id) {
        /// Member identifier.
        id -> Uuid,
        /// Display name used in mention tokens.
        #[max_length = 255]
        name -> Varchar,
        /// Chat context the member belongs to.
        group_id -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ledger of generated recurring occurrences.
    recurrence_occurrences (template_id, occurrence_date) {
        /// Template task that produced the occurrence.
        template_id -> Int8,
        /// Date the occurrence was generated for.
        occurrence_date -> Date,
        /// Generation timestamp.
        created_at -> Timestamptz,
    }
}
