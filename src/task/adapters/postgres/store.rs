//! `PostgreSQL` task store implementation.
//!
//! Per-task mutations run as read-modify-write transactions holding a
//! `FOR UPDATE` row lock, and the occurrence ledger insert relies on the
//! composite primary key, so concurrent completions, updates, and
//! generation runs serialise at the database rather than in application
//! code.

use super::{
    models::{NewOccurrenceRow, NewTaskRow, TaskRow},
    schema::{recurrence_occurrences, tasks},
};
use crate::task::{
    domain::{
        GroupId, MemberId, MemberName, PersistedTaskData, Priority, RecurrenceSchedule, Task,
        TaskDraft, TaskId, TaskPatch, TaskStatus,
    },
    ports::{CancelOutcome, CompletionRecord, TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::{Clock, DefaultClock};

/// `PostgreSQL` connection pool type used by taskline adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

impl From<diesel::result::Error> for TaskStoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn insert(&self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let new_row = draft_to_new_row(&draft)?;
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn insert_batch(&self, drafts: Vec<TaskDraft>) -> TaskStoreResult<Vec<Task>> {
        let new_rows = drafts
            .iter()
            .map(draft_to_new_row)
            .collect::<TaskStoreResult<Vec<_>>>()?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx_conn| {
                let rows = diesel::insert_into(tasks::table)
                    .values(&new_rows)
                    .returning(TaskRow::as_returning())
                    .get_results::<TaskRow>(tx_conn)?;
                rows.into_iter().map(row_to_task).collect()
            })
        })
        .await
    }

    async fn find_by_id(&self, group: &GroupId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let group_key = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::group_id.eq(group_key))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn complete(
        &self,
        group: &GroupId,
        id: TaskId,
        completed_at: DateTime<Utc>,
    ) -> TaskStoreResult<Option<CompletionRecord>> {
        let group_key = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx_conn| {
                let Some(row) = lock_row(tx_conn, &group_key, id)? else {
                    return Ok(None);
                };
                let mut task = row_to_task(row)?;
                let transitioned = task.complete(completed_at);
                if transitioned {
                    diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                        .set((
                            tasks::status.eq(task.status().as_str()),
                            tasks::completed_at.eq(task.completed_at()),
                        ))
                        .execute(tx_conn)?;
                }
                Ok(Some(CompletionRecord {
                    task,
                    already_done: !transitioned,
                }))
            })
        })
        .await
    }

    async fn apply_patch(
        &self,
        group: &GroupId,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskStoreResult<Option<Task>> {
        let group_key = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx_conn| {
                let Some(row) = lock_row(tx_conn, &group_key, id)? else {
                    return Ok(None);
                };
                let mut task = row_to_task(row)?;
                task.apply_patch(&patch);
                diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                    .set((
                        tasks::content.eq(task.content().to_owned()),
                        tasks::priority.eq(task.priority().as_str()),
                        tasks::due_date.eq(task.due_date()),
                    ))
                    .execute(tx_conn)?;
                Ok(Some(task))
            })
        })
        .await
    }

    async fn delete(&self, group: &GroupId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let group_key = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::group_id.eq(group_key)),
            )
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn cancel_recurrence(
        &self,
        group: &GroupId,
        id: TaskId,
    ) -> TaskStoreResult<Option<CancelOutcome>> {
        let group_key = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx_conn| {
                let Some(row) = lock_row(tx_conn, &group_key, id)? else {
                    return Ok(None);
                };
                let mut task = row_to_task(row)?;
                if !task.cancel_recurrence() {
                    return Ok(Some(CancelOutcome::NotRecurring));
                }
                let payload = task
                    .recurrence()
                    .map(serde_json::to_value)
                    .transpose()
                    .map_err(TaskStoreError::persistence)?;
                diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                    .set(tasks::recurrence.eq(payload))
                    .execute(tx_conn)?;
                Ok(Some(CancelOutcome::Cancelled(task)))
            })
        })
        .await
    }

    async fn list(
        &self,
        group: &GroupId,
        assignee: Option<MemberId>,
    ) -> TaskStoreResult<Vec<Task>> {
        let group_key = group.as_str().to_owned();
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .filter(tasks::group_id.eq(group_key))
                .into_boxed();
            if let Some(member) = assignee {
                query = query.filter(tasks::assignee_id.eq(member.into_inner()));
            }
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            let mut listed = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskStoreResult<Vec<_>>>()?;
            listed.sort_by_key(Task::listing_key);
            Ok(listed)
        })
        .await
    }

    async fn recurrence_templates(&self) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::recurrence.is_not_null())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            let templates = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskStoreResult<Vec<_>>>()?;
            Ok(templates
                .into_iter()
                .filter(Task::has_active_recurrence)
                .collect())
        })
        .await
    }

    async fn insert_occurrence(
        &self,
        template_id: TaskId,
        date: NaiveDate,
        draft: TaskDraft,
    ) -> TaskStoreResult<Option<Task>> {
        let ledger_row = NewOccurrenceRow {
            template_id: template_id.into_inner(),
            occurrence_date: date,
            created_at: DefaultClock.utc(),
        };
        let new_task_row = draft_to_new_row(&draft)?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskStoreError, _>(|tx_conn| {
                // The composite primary key carries the idempotence
                // guarantee; a lost conflict means another invocation
                // already generated this (template, date) pair.
                let claimed = diesel::insert_into(recurrence_occurrences::table)
                    .values(&ledger_row)
                    .on_conflict_do_nothing()
                    .execute(tx_conn)?;
                if claimed == 0 {
                    return Ok(None);
                }
                let row = diesel::insert_into(tasks::table)
                    .values(&new_task_row)
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(tx_conn)?;
                row_to_task(row).map(Some)
            })
        })
        .await
    }
}

fn lock_row(
    connection: &mut PgConnection,
    group_key: &str,
    id: TaskId,
) -> TaskStoreResult<Option<TaskRow>> {
    let row = tasks::table
        .filter(tasks::id.eq(id.into_inner()))
        .filter(tasks::group_id.eq(group_key))
        .for_update()
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()?;
    Ok(row)
}

fn draft_to_new_row(draft: &TaskDraft) -> TaskStoreResult<NewTaskRow> {
    let recurrence = draft
        .recurrence()
        .map(serde_json::to_value)
        .transpose()
        .map_err(TaskStoreError::persistence)?;
    Ok(NewTaskRow {
        group_id: draft.group().as_str().to_owned(),
        assignee_id: draft.assignee().into_inner(),
        assignee_name: draft.assignee_name().as_str().to_owned(),
        content: draft.content().to_owned(),
        priority: draft.priority().as_str().to_owned(),
        due_date: draft.due_date(),
        status: TaskStatus::Open.as_str().to_owned(),
        recurrence,
        created_at: draft.created_at(),
        completed_at: None,
    })
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        group_id,
        assignee_id,
        assignee_name,
        content,
        priority,
        due_date,
        status,
        recurrence,
        created_at,
        completed_at,
    } = row;

    let schedule = recurrence
        .map(serde_json::from_value::<RecurrenceSchedule>)
        .transpose()
        .map_err(TaskStoreError::persistence)?;
    let data = PersistedTaskData {
        id: TaskId::from_sequence(id).map_err(TaskStoreError::persistence)?,
        group: GroupId::new(group_id),
        assignee: MemberId::from_uuid(assignee_id),
        assignee_name: MemberName::new(assignee_name).map_err(TaskStoreError::persistence)?,
        content,
        priority: Priority::try_from(priority.as_str()).map_err(TaskStoreError::persistence)?,
        due_date,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskStoreError::persistence)?,
        recurrence: schedule,
        created_at,
        completed_at,
    };
    Ok(Task::from_persisted(data))
}
