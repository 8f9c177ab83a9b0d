//! Orchestration services applying validated commands to the task store.

mod lifecycle;

pub use lifecycle::{
    BatchCreateRequest, CreateRecurringRequest, CreateTaskRequest, RecurringCreation,
    TaskCommandError, TaskCommandResult, TaskLifecycleService,
};
