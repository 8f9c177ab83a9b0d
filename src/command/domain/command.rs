//! The typed command variants handed to the lifecycle engine.

use crate::task::domain::{MemberName, Priority, RecurrenceRule, TaskId, TaskLine, TaskPatch};
use chrono::NaiveDate;

/// A fully validated chat command.
///
/// Instances only exist for input that passed every field validation; the
/// lifecycle engine never sees malformed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create one open task for a member.
    Create {
        /// Assignee mention, resolved by the directory downstream.
        assignee: MemberName,
        /// Priority, `Normal` when no marker was given.
        priority: Priority,
        /// Task content.
        content: String,
        /// Optional due date.
        due_date: Option<NaiveDate>,
    },
    /// Create one task per line, all assigned to the same member.
    BatchCreate {
        /// Assignee mention applied to every line.
        assignee: MemberName,
        /// Validated task lines; never empty.
        lines: Vec<TaskLine>,
    },
    /// Create a recurring-schedule template.
    CreateRecurring {
        /// Assignee mention.
        assignee: MemberName,
        /// Priority, `Normal` when no marker was given.
        priority: Priority,
        /// Task content copied onto each occurrence.
        content: String,
        /// The repeating schedule.
        rule: RecurrenceRule,
    },
    /// Cancel a template's recurring schedule.
    CancelRecurring {
        /// Template task identifier.
        id: TaskId,
    },
    /// Complete a task.
    Complete {
        /// Task identifier.
        id: TaskId,
    },
    /// List the group's tasks.
    List {
        /// Optional assignee filter.
        assignee: Option<MemberName>,
    },
    /// Update a task's mutable fields.
    Update {
        /// Task identifier.
        id: TaskId,
        /// Fields to change; never empty.
        patch: TaskPatch,
    },
    /// Permanently delete a task.
    Delete {
        /// Task identifier.
        id: TaskId,
    },
    /// Show one task in full.
    Detail {
        /// Task identifier.
        id: TaskId,
    },
    /// Show the command reference.
    Help,
    /// Binary divination draw over a question.
    Divination {
        /// The question posed.
        question: String,
    },
    /// Random choice among options.
    Lottery {
        /// Whitespace-separated options; never empty.
        options: Vec<String>,
    },
}
