//! Thread-safe in-memory task store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{GroupId, MemberId, Task, TaskDraft, TaskId, TaskPatch},
    ports::{CancelOutcome, CompletionRecord, TaskStore, TaskStoreError, TaskStoreResult},
};

/// In-memory [`TaskStore`] backed by an `RwLock`.
///
/// Every mutating operation runs inside one writer critical section, which
/// gives the same per-task serialisation the SQL adapter gets from row
/// locks, and the occurrence ledger is a set keyed on
/// (template id, date).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
    occurrence_ledger: HashSet<(TaskId, NaiveDate)>,
}

impl InMemoryTaskState {
    fn allocate_id(&mut self) -> TaskStoreResult<TaskId> {
        self.next_id += 1;
        TaskId::from_sequence(self.next_id).map_err(TaskStoreError::persistence)
    }

    fn scoped_task(&self, group: &GroupId, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id).filter(|task| task.group() == group)
    }

    fn scoped_task_mut(&mut self, group: &GroupId, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id).filter(|task| task.group() == group)
    }
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let mut state = self.write_state()?;
        let id = state.allocate_id()?;
        let task = Task::from_draft(id, draft);
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn insert_batch(&self, drafts: Vec<TaskDraft>) -> TaskStoreResult<Vec<Task>> {
        // One writer critical section for the whole batch keeps it
        // all-or-nothing: id allocation cannot fail mid-way, so either
        // every draft lands or the lock was never taken.
        let mut state = self.write_state()?;
        let mut tasks = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = state.allocate_id()?;
            let task = Task::from_draft(id, draft);
            state.tasks.insert(id, task.clone());
            tasks.push(task);
        }
        Ok(tasks)
    }

    async fn find_by_id(&self, group: &GroupId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.read_state()?;
        Ok(state.scoped_task(group, id).cloned())
    }

    async fn complete(
        &self,
        group: &GroupId,
        id: TaskId,
        completed_at: DateTime<Utc>,
    ) -> TaskStoreResult<Option<CompletionRecord>> {
        let mut state = self.write_state()?;
        let Some(task) = state.scoped_task_mut(group, id) else {
            return Ok(None);
        };
        let transitioned = task.complete(completed_at);
        Ok(Some(CompletionRecord {
            task: task.clone(),
            already_done: !transitioned,
        }))
    }

    async fn apply_patch(
        &self,
        group: &GroupId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskStoreResult<Option<Task>> {
        let mut state = self.write_state()?;
        let Some(task) = state.scoped_task_mut(group, id) else {
            return Ok(None);
        };
        task.apply_patch(&patch);
        Ok(Some(task.clone()))
    }

    async fn delete(&self, group: &GroupId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let mut state = self.write_state()?;
        if state.scoped_task(group, id).is_none() {
            return Ok(None);
        }
        Ok(state.tasks.remove(&id))
    }

    async fn cancel_recurrence(
        &self,
        group: &GroupId,
        id: TaskId,
    ) -> TaskStoreResult<Option<CancelOutcome>> {
        let mut state = self.write_state()?;
        let Some(task) = state.scoped_task_mut(group, id) else {
            return Ok(None);
        };
        if task.cancel_recurrence() {
            Ok(Some(CancelOutcome::Cancelled(task.clone())))
        } else {
            Ok(Some(CancelOutcome::NotRecurring))
        }
    }

    async fn list(
        &self,
        group: &GroupId,
        assignee: Option<MemberId>,
    ) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.group() == group)
            .filter(|task| assignee.is_none_or(|member| task.assignee() == member))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::listing_key);
        Ok(tasks)
    }

    async fn recurrence_templates(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.read_state()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.has_active_recurrence())
            .cloned()
            .collect())
    }

    async fn insert_occurrence(
        &self,
        template_id: TaskId,
        date: NaiveDate,
        draft: TaskDraft,
    ) -> TaskStoreResult<Option<Task>> {
        let mut state = self.write_state()?;
        if !state.occurrence_ledger.insert((template_id, date)) {
            return Ok(None);
        }
        let id = state.allocate_id()?;
        let task = Task::from_draft(id, draft);
        state.tasks.insert(id, task.clone());
        Ok(Some(task))
    }
}
