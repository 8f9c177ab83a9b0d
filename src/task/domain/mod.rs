//! Domain model for task lifecycle management.
//!
//! The task domain models group-scoped to-do items with priorities, due
//! dates, and recurring schedules, while keeping all infrastructure
//! concerns outside of the domain boundary.

mod due_date;
mod error;
mod ids;
mod member;
mod priority;
mod recurrence;
mod task;

pub use due_date::{is_date_shaped, parse_due_date};
pub use error::{ParsePriorityError, ParseStatusError, TaskDomainError};
pub use ids::{GroupId, MemberId, MemberName, TaskId};
pub use member::Member;
pub use priority::Priority;
pub use recurrence::{RecurrenceRule, RecurrenceSchedule};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskLine, TaskPatch, TaskStatus};
